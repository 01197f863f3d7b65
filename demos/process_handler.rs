use fieldgate::{Binder, MemoryForm, RuleRegistry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let registry = RuleRegistry::from_file("demos/forms/process_handler.rules")
        .expect("failed to load rules");
    println!("{registry}");

    let mut form = MemoryForm::new()
        .field("name", "kim")
        .field("process", "")
        .field("cohort", "3");
    let binder = Binder::initialize(registry, &mut form);
    println!("fields: {:?}", form.keys());

    for text in ["e", "et", "etch"] {
        form.type_text("process", text).expect("field exists");
    }
    binder.run(&mut form);
    println!("etch_options visible: {:?}", form.is_visible("etch_options"));

    form.check("etch_lam", true).expect("field exists");
    binder.run(&mut form);
    report(&form);

    form.check("etch_tas", true).expect("field exists");
    binder.run(&mut form);
    report(&form);

    form.check("etch_tas", false).expect("field exists");
    binder.run(&mut form);
    report(&form);
}

fn report(form: &MemoryForm) {
    let show = |key: &str| form.get(key).map(ToString::to_string).unwrap_or_default();
    println!(
        "process = {}, etch_tas = {}, etch_lam = {}",
        show("process"),
        show("etch_tas"),
        show("etch_lam"),
    );
}
