use std::sync::Arc;
use std::thread;

use fieldgate::{Binder, MemoryForm, RuleRegistry, RuleRegistryBuilder, Value, clear, hide, show, value};

fn quiz_admin() -> RuleRegistry {
    RuleRegistryBuilder::new()
        .rule("exam_sheet", |r| {
            r.watch("generation_method")
                .when(value().eq("지정"))
                .then(show("exam_sheet"))
                .otherwise(hide("exam_sheet"))
        })
        .rule("associated_process", |r| {
            r.watch("category")
                .when(value().eq("공정"))
                .then(show("associated_process"))
                .otherwise(hide("associated_process"))
                .otherwise(clear("associated_process"))
        })
        .compile()
        .unwrap()
}

#[test]
fn shared_registry_across_threads() {
    let registry = Arc::new(quiz_admin());

    let mut handles = vec![];

    // Each thread drives its own form against the shared registry.
    for (method, category) in [("지정", "공정"), ("랜덤", "공통"), ("태그", "공정"), ("지정", "공통")] {
        let rs = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let mut form = MemoryForm::new()
                .field("generation_method", "랜덤")
                .field("exam_sheet", "")
                .field("category", "공정")
                .field("associated_process", "ETCH");
            let binder = Binder::initialize(rs, &mut form);

            form.select("generation_method", method).unwrap();
            form.select("category", category).unwrap();
            binder.run(&mut form);

            (
                form.is_visible("exam_sheet"),
                form.is_visible("associated_process"),
                form.get("associated_process").cloned(),
            )
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], (Some(true), Some(true), Some(Value::from("ETCH"))));
    assert_eq!(results[1], (Some(false), Some(false), Some(Value::from(""))));
    assert_eq!(results[2], (Some(false), Some(true), Some(Value::from("ETCH"))));
    assert_eq!(results[3], (Some(true), Some(false), Some(Value::from(""))));
}

#[test]
fn evaluate_across_threads() {
    let registry = Arc::new(quiz_admin());

    let handles: Vec<_> = ["지정", "랜덤", "태그"]
        .into_iter()
        .map(|method| {
            let rs = Arc::clone(&registry);
            thread::spawn(move || rs.evaluate("generation_method", &method.into()))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], vec![show("exam_sheet")]);
    assert_eq!(results[1], vec![hide("exam_sheet")]);
    assert_eq!(results[2], vec![hide("exam_sheet")]);
}
