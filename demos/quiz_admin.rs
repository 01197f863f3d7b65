use fieldgate::{Binder, MemoryForm, RuleRegistryBuilder, clear, hide, show, value};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_target(false)
        .init();

    // Define rules
    let registry = RuleRegistryBuilder::new()
        .rule("exam_sheet_toggle", |r| {
            r.watch("generation_method")
                .when(value().eq("지정"))
                .then(show("exam_sheet"))
                .otherwise(hide("exam_sheet"))
        })
        .rule("required_tags_toggle", |r| {
            r.watch("generation_method")
                .when(value().eq("태그"))
                .then(show("required_tags"))
                .otherwise(hide("required_tags"))
        })
        .rule("associated_process_toggle", |r| {
            r.watch("category")
                .when(value().eq("공정"))
                .then(show("associated_process"))
                .otherwise(hide("associated_process"))
                .otherwise(clear("associated_process"))
        })
        .compile()
        .expect("failed to compile rules");

    println!("{registry}");

    let mut form = MemoryForm::new()
        .field("title", "ETCH 기초")
        .field("generation_method", "랜덤")
        .field("exam_sheet", "")
        .field("required_tags", "")
        .field("category", "공정")
        .field("associated_process", "ETCH");

    let binder = Binder::initialize(registry, &mut form);
    print_form("after load", &form);

    form.select("generation_method", "지정").expect("field exists");
    form.select("category", "공통").expect("field exists");
    binder.run(&mut form);
    print_form("after edits", &form);
}

fn print_form(label: &str, form: &MemoryForm) {
    println!("{label}:");
    for key in form.keys() {
        let shown = if form.is_visible(key) == Some(true) { "shown" } else { "hidden" };
        if let Some(v) = form.get(key) {
            println!("  {key:<20} {shown:<7} {v}");
        }
    }
}
