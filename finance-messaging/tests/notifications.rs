use async_trait::async_trait;
use finance_messaging::{
    AnyNotification, DispatchContext, Dispatcher, Mediator, MediatorConfig, MediatorError,
    NotificationHandler, notification,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

#[notification(name = "widgets.created")]
struct WidgetCreated {
    id: u64,
}

#[notification(name = "widgets.deleted")]
struct WidgetDeleted {
    id: u64,
}

#[derive(Default)]
struct Counter {
    seen: AtomicUsize,
}

#[async_trait]
impl NotificationHandler<WidgetCreated> for Counter {
    async fn handle(&self, _ctx: &DispatchContext, n: &WidgetCreated) -> anyhow::Result<()> {
        self.seen.fetch_add(n.id as usize, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<WidgetDeleted> for Counter {
    async fn handle(&self, _ctx: &DispatchContext, _n: &WidgetDeleted) -> anyhow::Result<()> {
        self.seen.fetch_add(100, Ordering::SeqCst);
        Ok(())
    }
}

struct Failing;

#[async_trait]
impl NotificationHandler<WidgetCreated> for Failing {
    fn handler_name(&self) -> &str {
        "failing"
    }

    async fn handle(&self, _ctx: &DispatchContext, n: &WidgetCreated) -> anyhow::Result<()> {
        anyhow::bail!("cannot index widget {}", n.id)
    }
}

struct Panicking;

#[async_trait]
impl NotificationHandler<WidgetCreated> for Panicking {
    fn handler_name(&self) -> &str {
        "panicking"
    }

    async fn handle(&self, _ctx: &DispatchContext, _n: &WidgetCreated) -> anyhow::Result<()> {
        panic!("index corrupted")
    }
}

// 测试没有订阅者时发布成功
#[tokio::test(flavor = "multi_thread")]
async fn test_publish_without_subscribers() {
    let mediator = Mediator::builder().build();
    mediator
        .publish(&DispatchContext::default(), WidgetCreated { id: 1 })
        .await
        .unwrap();
}

// 测试 WidgetCreated：一个处理器失败，其余处理器仍执行，失败汇总上报
#[tokio::test(flavor = "multi_thread")]
async fn test_failing_handler_does_not_stop_siblings() {
    let first = Arc::new(Counter::default());
    let second = Arc::new(Counter::default());
    let mediator = Mediator::builder()
        .notification_handler::<WidgetCreated, _>(first.clone())
        .notification_handler::<WidgetCreated, _>(Arc::new(Failing))
        .notification_handler::<WidgetCreated, _>(second.clone())
        .build();

    let err = mediator
        .publish(&DispatchContext::default(), WidgetCreated { id: 3 })
        .await
        .unwrap_err();

    assert_eq!(first.seen.load(Ordering::SeqCst), 3);
    assert_eq!(second.seen.load(Ordering::SeqCst), 3);

    let MediatorError::Publish(failure) = err else {
        panic!("expected publish failure, got {err:?}");
    };
    assert_eq!(failure.notification, "widgets.created");
    assert_eq!(failure.total, 3);
    assert_eq!(failure.handler_names().collect::<Vec<_>>(), vec!["failing"]);
    assert_eq!(failure.failures[0].error.to_string(), "cannot index widget 3");
}

// 测试 panic 的处理器被捕获并作为失败上报
#[tokio::test(flavor = "multi_thread")]
async fn test_panicking_handler_reported() {
    let counter = Arc::new(Counter::default());
    let mediator = Mediator::builder()
        .notification_handler::<WidgetCreated, _>(Arc::new(Panicking))
        .notification_handler::<WidgetCreated, _>(counter.clone())
        .build();

    let err = mediator
        .publish(&DispatchContext::default(), WidgetCreated { id: 2 })
        .await
        .unwrap_err();

    assert_eq!(counter.seen.load(Ordering::SeqCst), 2);
    let MediatorError::Publish(failure) = err else {
        panic!("expected publish failure");
    };
    assert_eq!(failure.handler_names().collect::<Vec<_>>(), vec!["panicking"]);
    assert!(failure.failures[0].error.to_string().contains("index corrupted"));
}

/// 在屏障处等待全部同伴的处理器
struct Rendezvous {
    barrier: Arc<Barrier>,
}

#[async_trait]
impl NotificationHandler<WidgetCreated> for Rendezvous {
    async fn handle(&self, _ctx: &DispatchContext, _n: &WidgetCreated) -> anyhow::Result<()> {
        self.barrier.wait().await;
        Ok(())
    }
}

fn rendezvous_mediator(k: usize, config: MediatorConfig) -> Mediator {
    let barrier = Arc::new(Barrier::new(k));
    let mut builder = Mediator::builder().config(config);
    for _ in 0..k {
        builder = builder.notification_handler::<WidgetCreated, _>(Arc::new(Rendezvous {
            barrier: barrier.clone(),
        }));
    }
    builder.build()
}

// 测试 K 个订阅者全部启动后才有任何一个完成（串行执行会在屏障处卡死）
#[tokio::test(flavor = "multi_thread")]
async fn test_all_subscribers_start_before_any_finishes() {
    let mediator = rendezvous_mediator(5, MediatorConfig::default());

    tokio::time::timeout(
        Duration::from_secs(5),
        mediator.publish(&DispatchContext::default(), WidgetCreated { id: 1 }),
    )
    .await
    .expect("handlers should run concurrently")
    .unwrap();
}

// 测试并发上限不小于订阅者数时同样全部并发
#[tokio::test(flavor = "multi_thread")]
async fn test_bounded_fan_out() {
    let mediator = rendezvous_mediator(
        3,
        MediatorConfig {
            notification_concurrency: Some(3),
            ..MediatorConfig::default()
        },
    );

    tokio::time::timeout(
        Duration::from_secs(5),
        mediator.publish(&DispatchContext::default(), WidgetCreated { id: 1 }),
    )
    .await
    .expect("handlers should run concurrently")
    .unwrap();
}

// 测试以 trait 对象发布时按具体运行时类型路由
#[tokio::test(flavor = "multi_thread")]
async fn test_publish_dyn_routes_by_runtime_type() {
    let counter = Arc::new(Counter::default());
    let mediator = Mediator::builder()
        .notification_handler::<WidgetCreated, _>(counter.clone())
        .notification_handler::<WidgetDeleted, _>(counter.clone())
        .build();
    let ctx = DispatchContext::default();

    let events: Vec<Box<dyn AnyNotification>> = vec![
        Box::new(WidgetCreated { id: 4 }),
        Box::new(WidgetDeleted { id: 4 }),
        Box::new(WidgetCreated { id: 1 }),
    ];
    for event in &events {
        mediator.publish_dyn(&ctx, event.as_ref()).await.unwrap();
    }

    assert_eq!(counter.seen.load(Ordering::SeqCst), 105);
    assert_eq!(
        mediator.registered_notifications(),
        vec!["widgets.created", "widgets.deleted"]
    );
}

/// 记录收到的关联 ID
struct CorrelationRecorder {
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

#[async_trait]
impl NotificationHandler<WidgetCreated> for CorrelationRecorder {
    async fn handle(&self, ctx: &DispatchContext, _n: &WidgetCreated) -> anyhow::Result<()> {
        self.seen
            .lock()
            .unwrap()
            .push(ctx.correlation_id().map(str::to_string));
        Ok(())
    }
}

// 测试上下文原样传递给通知处理器
#[tokio::test(flavor = "multi_thread")]
async fn test_context_forwarded_to_handlers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mediator = Mediator::builder()
        .notification_handler::<WidgetCreated, _>(Arc::new(CorrelationRecorder { seen: seen.clone() }))
        .build();

    let ctx = DispatchContext::builder().correlation_id("cor-7".into()).build();
    mediator.publish(&ctx, WidgetCreated { id: 1 }).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some("cor-7".to_string())]);
}

// 测试通过 Dispatcher trait 发布（泛型与 trait 对象两种方式）
#[tokio::test(flavor = "multi_thread")]
async fn test_publish_through_dispatcher_trait() {
    async fn announce<D: Dispatcher>(dispatcher: &D, ctx: &DispatchContext) -> Result<(), MediatorError> {
        dispatcher.publish(ctx, WidgetCreated { id: 2 }).await?;
        let deleted: Box<dyn AnyNotification> = Box::new(WidgetDeleted { id: 2 });
        dispatcher.publish_dyn(ctx, deleted.as_ref()).await
    }

    let counter = Arc::new(Counter::default());
    let mediator = Mediator::builder()
        .notification_handler::<WidgetCreated, _>(counter.clone())
        .notification_handler::<WidgetDeleted, _>(counter.clone())
        .build();

    announce(&mediator, &DispatchContext::default()).await.unwrap();
    assert_eq!(counter.seen.load(Ordering::SeqCst), 102);
}

// 测试发布的 future 可以交给多线程运行时派生执行
#[tokio::test(flavor = "multi_thread")]
async fn test_publish_on_spawned_task() {
    let counter = Arc::new(Counter::default());
    for config in [
        MediatorConfig::default(),
        MediatorConfig {
            notification_concurrency: Some(1),
            ..MediatorConfig::default()
        },
    ] {
        let mediator = Mediator::builder()
            .notification_handler::<WidgetCreated, _>(counter.clone())
            .notification_handler::<WidgetCreated, _>(counter.clone())
            .config(config)
            .build();

        let m = mediator.clone();
        let ctx = DispatchContext::default();
        tokio::spawn(async move { m.publish(&ctx, WidgetCreated { id: 5 }).await })
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(counter.seen.load(Ordering::SeqCst), 20);
}
