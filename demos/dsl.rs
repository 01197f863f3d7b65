use fieldgate::{Binder, MemoryForm, RuleRegistry};

fn main() {
    let registry =
        RuleRegistry::from_file("demos/forms/quiz_admin.rules").expect("failed to load rules");

    println!("{registry}");
    println!("controllers: {:?}", registry.controllers());

    let mut form = MemoryForm::new()
        .field("generation_method", "태그")
        .field("exam_sheet", "")
        .field("required_tags", "")
        .field("category", "공통")
        .field("associated_process", "")
        .field("allowed_groups", "")
        .field("allowed_users", "");
    let binder = Binder::initialize(registry, &mut form);

    form.select("access_mode", "both").expect("injected by the rules");
    binder.run(&mut form);

    for key in form.keys() {
        println!("{key}: visible = {:?}", form.is_visible(key));
    }
}
