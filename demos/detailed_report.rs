use fieldgate::{ExclusiveGroup, RuleRegistryBuilder, Value, exclusive, hide, show, value};

fn main() {
    let registry = RuleRegistryBuilder::new()
        .group(
            ExclusiveGroup::new("etch_detail", "process", "ETCH")
                .member("etch_tas", "TAS")
                .member("etch_lam", "LAM"),
        )
        .rule("etch_options_toggle", |r| {
            r.watch("process")
                .when(value().icontains("ETCH"))
                .then(show("etch_options"))
                .otherwise(hide("etch_options"))
        })
        .rule("etch_tas_selected", |r| {
            r.watch("etch_tas")
                .deferred()
                .when(value().is_checked())
                .then(exclusive("etch_detail", Some("etch_tas")))
                .otherwise(exclusive("etch_detail", None))
        })
        .compile()
        .expect("failed to compile rules");

    let report = registry.evaluate_detailed("etch_tas", &Value::Bool(true));

    println!("{report}");
    println!();
    println!("Matched: {:?}", report.matched());
    println!("Unmatched: {:?}", report.unmatched());
    println!("Final process write: {:?}", report.final_write("process"));
    println!("Duration: {:?}", report.duration());

    let report = registry.evaluate_detailed("process", &"etch_something".into());
    println!();
    println!("{report}");
    println!("etch_options visible: {:?}", report.visibility("etch_options"));
}
