use std::sync::Arc;

use crate::adapter::{AdapterError, ChangeEvent, FormAdapter, Subscription};
use crate::{Directive, RuleRegistry};

/// Connects a compiled [`RuleRegistry`] to a live form.
///
/// The binder owns no form state: every value and visibility flag lives in
/// the adapter. Evaluation is synchronous and each event is fully applied
/// before the next one is read.
#[derive(Debug)]
pub struct Binder {
    registry: Arc<RuleRegistry>,
    subscriptions: Vec<Subscription>,
    startup: ApplyOutcome,
}

/// What one evaluate-and-apply pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ApplyOutcome {
    /// Directives written to the form.
    pub applied: usize,
    /// Keys the form could not resolve, in the order they were hit.
    pub missing: Vec<String>,
}

impl ApplyOutcome {
    fn merge(&mut self, other: ApplyOutcome) {
        self.applied += other.applied;
        self.missing.extend(other.missing);
    }
}

impl Binder {
    /// Bind a registry to a form.
    ///
    /// Inserts every declared element, then for each controller (in order of
    /// first appearance) subscribes at the controller's trigger granularity
    /// and applies its non-deferred rules once against the current value.
    /// Controllers the form cannot resolve are reported and left unbound.
    pub fn initialize<A: FormAdapter>(
        registry: impl Into<Arc<RuleRegistry>>,
        adapter: &mut A,
    ) -> Self {
        let registry = registry.into();

        for markup in registry.injections() {
            match adapter.insert_element(markup) {
                Ok(()) => tracing::debug!(key = %markup.key, after = %markup.after, "inserted element"),
                Err(err) => tracing::warn!(key = %markup.key, error = %err, "element not inserted"),
            }
        }

        let mut subscriptions = Vec::new();
        let mut startup = ApplyOutcome::default();
        for controller in registry.controllers() {
            let trigger = registry.trigger_for(controller).unwrap_or_default();
            let subscription = match adapter.on_change(controller, trigger) {
                Ok(s) => s,
                Err(err) => {
                    tracing::warn!(controller, error = %err, "controller not bound");
                    continue;
                }
            };
            tracing::debug!(controller, %trigger, "bound controller");
            subscriptions.push(subscription);

            match adapter.value(controller) {
                Ok(current) => {
                    let directives = registry.evaluate_initial(controller, &current);
                    startup.merge(apply_all(&registry, adapter, &directives));
                }
                Err(err) => tracing::warn!(controller, error = %err, "initial value unavailable"),
            }
        }

        Self {
            registry,
            subscriptions,
            startup,
        }
    }

    /// Evaluate one change event and apply the resulting directives in order.
    ///
    /// The controller is evaluated at the value the form holds now, so an
    /// event that sat in the queue while earlier events rewrote its field
    /// sees the rewritten value. The event's own value is used only when the
    /// form cannot resolve the key.
    ///
    /// Events for controllers this binder did not bind, or keystroke events
    /// for controllers bound at commit granularity, are ignored.
    pub fn handle<A: FormAdapter>(&self, adapter: &mut A, event: &ChangeEvent) -> ApplyOutcome {
        let bound = self
            .subscriptions
            .iter()
            .any(|s| s.key == event.key && s.trigger.accepts(event.kind));
        if !bound {
            tracing::debug!(%event, "ignoring event for unbound controller");
            return ApplyOutcome::default();
        }

        let current = match adapter.value(&event.key) {
            Ok(current) => current,
            Err(err) => {
                tracing::debug!(%event, error = %err, "using queued value");
                event.value.clone()
            }
        };
        let directives = self.registry.evaluate(&event.key, &current);
        tracing::debug!(%event, %current, directives = directives.len(), "handling change");
        apply_all(&self.registry, adapter, &directives)
    }

    /// Drain the adapter's event queue, handling one event at a time.
    /// Returns the number of events handled.
    pub fn run<A: FormAdapter>(&self, adapter: &mut A) -> usize {
        self.drain(adapter).0
    }

    /// Like [`run`](Self::run), also returning the merged outcome of every
    /// handled event.
    pub fn drain<A: FormAdapter>(&self, adapter: &mut A) -> (usize, ApplyOutcome) {
        let mut handled = 0;
        let mut total = ApplyOutcome::default();
        while let Some(event) = adapter.next_event() {
            total.merge(self.handle(adapter, &event));
            handled += 1;
        }
        (handled, total)
    }

    /// Apply directives to the form in order; later writes win.
    ///
    /// Group directives are settled through the registry, so the selected
    /// member ends up checked along with the composite. A directive whose
    /// target is missing is reported and skipped without stopping the rest.
    pub fn apply<A: FormAdapter>(&self, adapter: &mut A, directives: &[Directive]) -> ApplyOutcome {
        apply_all(&self.registry, adapter, directives)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// What the startup pass of [`initialize`](Self::initialize) applied and
    /// which fields it could not find.
    #[must_use]
    pub fn startup(&self) -> &ApplyOutcome {
        &self.startup
    }

    /// Subscriptions made during [`initialize`](Self::initialize).
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

fn apply_all<A: FormAdapter>(
    registry: &RuleRegistry,
    adapter: &mut A,
    directives: &[Directive],
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    for directive in directives {
        if let Directive::MutuallyExclusiveSet { .. } = directive {
            let lowered = registry.lower(directive);
            outcome.merge(apply_all(registry, adapter, &lowered));
            continue;
        }
        match apply_one(adapter, directive) {
            Ok(()) => outcome.applied += 1,
            Err(AdapterError::MissingField { key }) => {
                tracing::warn!(%directive, key = %key, "skipping directive for missing field");
                outcome.missing.push(key);
            }
            Err(err) => tracing::warn!(%directive, error = %err, "directive not applied"),
        }
    }
    outcome
}

fn apply_one<A: FormAdapter>(adapter: &mut A, directive: &Directive) -> Result<(), AdapterError> {
    match directive {
        Directive::SetVisible { target, visible } => adapter.set_visible(target, *visible),
        Directive::SetValue { target, value } => adapter.set_value(target, value.clone()),
        Directive::ClearValue { target } => {
            let current = adapter.value(target)?;
            adapter.set_value(target, current.cleared())
        }
        Directive::MutuallyExclusiveSet { .. } => Ok(()),
    }
}
