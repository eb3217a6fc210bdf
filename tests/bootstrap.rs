use bootwright::lifecycle::{
    AppBuilder, Application, Discovery, HookAliases, HookContext, HookSlot, LifecycleError,
    LifecycleManager, Phase, Readiness, Rejection,
};
use bootwright::{BootstrapOptions, ConfigService, Injectable, Resolve, ServiceCollection, bootstrapper};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Default)]
pub struct Journal(Mutex<Vec<String>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn builder_with_journal() -> (AppBuilder, Arc<Journal>) {
    let builder = AppBuilder::with_config(ConfigService::from_pairs([("GREETING", "hello")]));
    let journal = Arc::new(Journal::default());
    builder.services().register_shared(Arc::clone(&journal)).unwrap();
    (builder, journal)
}

mod ordering {
    use super::*;

    pub struct Second;

    #[bootstrapper]
    impl Second {
        pub fn configure_services(journal: Arc<Journal>) {
            journal.push("B");
        }
    }

    pub struct First;

    #[bootstrapper(priority = 100)]
    impl First {
        pub fn configure_services(journal: Arc<Journal>) {
            journal.push("A");
        }
    }
}

#[tokio::test]
async fn test_lower_priority_runs_first() {
    let (builder, journal) = builder_with_journal();
    let discovery = Discovery::modules([format!("{}::ordering", module_path!())]);

    let manager = LifecycleManager::discover(&BootstrapOptions::default(), &discovery);
    let priorities: Vec<_> = manager.bootstrappers().iter().map(|b| b.priority()).collect();
    assert_eq!(priorities, vec![100, 1000]);

    let (_app, tasks) = manager.bootstrap(builder).unwrap();
    assert!(tasks.is_empty());
    assert_eq!(journal.entries(), vec!["A", "B"]);
}

mod malformed {
    use super::*;

    pub struct SyncShapedAsync;

    #[bootstrapper]
    impl SyncShapedAsync {
        pub fn configure_services(journal: Arc<Journal>) {
            journal.push("should not run");
        }

        pub fn configure_builder_async(journal: Arc<Journal>) {
            journal.push("should not run either");
        }
    }
}

#[tokio::test]
async fn test_sync_shaped_async_hook_rejects_whole_module() {
    let (builder, journal) = builder_with_journal();
    let discovery = Discovery::modules([format!("{}::malformed", module_path!())]);

    let manager = LifecycleManager::discover(&BootstrapOptions::default(), &discovery);
    assert!(manager.bootstrappers().is_empty());
    assert!(matches!(
        manager.rejections(),
        [Rejection::MalformedAsync { method, .. }] if method == "configure_builder_async"
    ));

    manager.bootstrap(builder).unwrap();
    assert!(journal.entries().is_empty());
}

mod background {
    use super::*;

    pub struct FlakyWarmup;

    #[bootstrapper]
    impl FlakyWarmup {
        pub async fn initialize_services_async(journal: Arc<Journal>) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            journal.push("warmup finished");
            anyhow::bail!("cache unreachable")
        }

        pub fn decorate_app(journal: &Journal, app: &Application) {
            assert!(app.resolve::<ConfigService>().is_ok());
            journal.push("decorated");
        }
    }
}

#[tokio::test]
async fn test_failed_async_hook_still_reaches_ready() {
    let (builder, journal) = builder_with_journal();
    let readiness = Readiness::new();
    let discovery = Discovery::modules([format!("{}::background", module_path!())]);

    let started = tokio::time::Instant::now();
    let (_app, tasks) = bootwright::bootstrap(builder, &discovery).unwrap();
    assert_eq!(journal.entries(), vec!["decorated"]);
    assert!(!readiness.is_ready());

    let report = tasks.drain(&readiness).await;
    assert_eq!(report.failed, 1);
    assert!(readiness.is_ready());
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(journal.entries(), vec!["decorated", "warmup finished"]);
}

mod wiring {
    use super::*;

    pub struct Greeter {
        pub greeting: String,
    }

    pub trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    pub struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            42
        }
    }

    #[derive(Injectable)]
    pub struct GreeterBootstrapper {
        config: ConfigService,
        journal: Arc<Journal>,
    }

    #[bootstrapper(name = "Greeter", priority = 10)]
    impl GreeterBootstrapper {
        pub fn configure_services(&self, services: ServiceCollection) -> bootwright::Result<()> {
            let greeting = self.config.get("GREETING").unwrap_or_default();
            services.register(Greeter { greeting })?;
            services.register(FixedClock)?;
            services.bind::<dyn Clock, FixedClock, _>(|clock| clock as Arc<dyn Clock>)
        }

        pub fn configure_builder(ctx: &HookContext, builder: &AppBuilder) {
            assert_eq!(ctx.phase(), Phase::ConfigureBuilder);
            assert!(builder.services().contains::<Greeter>());
        }

        pub async fn initialize_services_async(
            &self,
            greeter: Arc<Greeter>,
            clock: Arc<dyn Clock>,
        ) {
            self.journal
                .push(format!("{} at {}", greeter.greeting, clock.now()));
        }
    }
}

#[tokio::test]
async fn test_hook_parameters_come_from_context_and_container() {
    let (builder, journal) = builder_with_journal();
    let readiness = Readiness::new();
    let discovery = Discovery::modules([format!("{}::wiring", module_path!())]);

    let manager = LifecycleManager::discover(&BootstrapOptions::default(), &discovery);
    assert_eq!(manager.bootstrappers().len(), 1);
    assert!(manager.bootstrappers()[0].name().ends_with("::Greeter"));

    let (app, tasks) = manager.bootstrap(builder).unwrap();
    tasks.drain(&readiness).await;

    assert_eq!(journal.entries(), vec!["hello at 42"]);
    assert_eq!(app.resolve::<wiring::Greeter>().unwrap().greeting, "hello");
}

mod failing {
    use super::*;

    pub struct Broken;

    #[bootstrapper(priority = 1)]
    impl Broken {
        pub fn configure_builder(missing: Arc<u128>) {
            let _ = missing;
        }
    }

    pub struct Later;

    #[bootstrapper(priority = 2)]
    impl Later {
        pub fn initialize_services(journal: Arc<Journal>) {
            journal.push("later");
        }
    }
}

#[tokio::test]
async fn test_unresolvable_sync_parameter_aborts_startup() {
    let (builder, journal) = builder_with_journal();
    let discovery = Discovery::modules([format!("{}::failing", module_path!())]);

    let Err(err) = bootwright::bootstrap(builder, &discovery) else {
        panic!("startup should have failed");
    };
    match err {
        LifecycleError::HookFailed { bootstrapper, hook, .. } => {
            assert!(bootstrapper.ends_with("::Broken"));
            assert_eq!(hook, "configure_builder");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(journal.entries().is_empty());
}

mod helpers {
    use super::*;

    pub struct WithHelpers;

    #[bootstrapper]
    impl WithHelpers {
        pub fn configure_services(journal: Arc<Journal>) {
            journal.push(Self::label());
        }

        #[hook]
        pub async fn warm_caches(journal: Arc<Journal>) {
            journal.push("warmed");
        }

        pub fn label() -> &'static str {
            "helper"
        }

        pub fn pick<T: Default>() -> T {
            T::default()
        }

        pub fn describe(&self) -> String {
            "not injectable".to_string()
        }
    }
}

#[tokio::test]
async fn test_public_helpers_are_not_hooks() {
    let (builder, journal) = builder_with_journal();
    let readiness = Readiness::new();
    let discovery = Discovery::modules([format!("{}::helpers", module_path!())]);
    let options = BootstrapOptions::default().with_aliases(
        HookAliases::web().with_slot(
            HookSlot::asynchronous(Phase::InitializeServices),
            ["warm_caches"],
        ),
    );

    let manager = LifecycleManager::discover(&options, &discovery);
    assert!(manager.rejections().is_empty());
    assert_eq!(
        manager.bootstrappers()[0].hooks().found_names(),
        ["configure_services", "warm_caches"]
    );

    let (_app, tasks) = manager.bootstrap(builder).unwrap();
    tasks.drain(&readiness).await;
    assert_eq!(journal.entries(), vec!["helper", "warmed"]);
    assert_eq!(helpers::WithHelpers::pick::<u8>(), 0);
    assert_eq!(helpers::WithHelpers.describe(), "not injectable");
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_rejections_and_background_failures_are_logged() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (builder, _journal) = builder_with_journal();
    let readiness = Readiness::new();
    let discovery = Discovery::modules([
        format!("{}::malformed", module_path!()),
        format!("{}::background", module_path!()),
    ]);

    let (_app, tasks) = bootwright::bootstrap(builder, &discovery).unwrap();
    tasks.drain(&readiness).await;

    let output = contents_lines(&logs);
    assert!(output.iter().any(|line| line.contains("WARN")
        && line.contains("SyncShapedAsync")
        && line.contains("found method configure_builder_async but it is not async")));
    assert!(output.iter().any(|line| line.contains("ERROR")
        && line.contains("FlakyWarmup.initialize_services_async")
        && line.contains("cache unreachable")));
    assert!(output
        .iter()
        .any(|line| line.contains("Background bootstrapping completed (0 succeeded, 1 failed)")));
}

fn contents_lines(logs: &CapturedLogs) -> Vec<String> {
    logs.contents().lines().map(str::to_string).collect()
}
