use propbind::{
    configurable, reconcile, ConfigBinder, ConfigProvider, PropertySet, VerificationHarness,
};

#[derive(Debug, Default)]
struct ServiceConfig {
    timeout_ms: u64,
    name: String,
    debug: bool,
}

configurable!(ServiceConfig {
    timeout_ms => "timeout",
    name => "",
    debug => "",
});

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table: toml::Table = toml::from_str(
        r#"
        [svc]
        timeout = 500
        name = "alpha"
        debug = true
        "#,
    )?;
    let properties = PropertySet::from_toml(&table)?;

    let binder = ConfigBinder::new();
    let result = binder.bind_type::<ServiceConfig>("svc", &properties)?;
    reconcile(&properties, &result).assert_fully_consumed()?;
    println!("Bound: {:?}", result.instance());

    let mut provider = ConfigProvider::<ServiceConfig>::of("svc");
    provider.inject(&properties, &binder)?;
    println!("Service {} (timeout={}ms)", provider.require()?.name, provider.require()?.timeout_ms);

    let report = VerificationHarness::new(binder).verify_default::<ServiceConfig>()?;
    println!("Verified {} fields of {}", report.assertions, report.type_name);

    Ok(())
}
