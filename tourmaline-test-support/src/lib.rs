//! Shared test utilities for the tourmaline crates.

pub mod tracing {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::Layer;

    /// Captures the instrumentation the forest emits, scoped to what the
    /// tests assert on: span names with their numeric size fields, and
    /// event messages with their levels.
    ///
    /// The batch spans carry all of their fields at creation, so spans are
    /// recorded straight from [`Layer::on_new_span`]; nothing is kept in
    /// span extensions.
    #[derive(Clone, Default)]
    pub struct BatchCapture {
        spans: Arc<Mutex<Vec<CapturedSpan>>>,
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedSpan {
        name: &'static str,
        sizes: Vec<(&'static str, u64)>,
    }

    #[derive(Clone, Debug)]
    struct CapturedEvent {
        level: Level,
        message: String,
    }

    impl BatchCapture {
        /// Numeric field recorded on the first span with this name.
        #[must_use]
        pub fn span_size(&self, name: &str, field: &str) -> Option<u64> {
            self.spans
                .lock()
                .expect("span capture poisoned")
                .iter()
                .find(|span| span.name == name)
                .and_then(|span| {
                    span.sizes
                        .iter()
                        .find(|(key, _)| *key == field)
                        .map(|&(_, value)| value)
                })
        }

        /// True when an event with this level and message was emitted.
        #[must_use]
        pub fn has_message(&self, level: Level, message: &str) -> bool {
            self.events
                .lock()
                .expect("event capture poisoned")
                .iter()
                .any(|event| event.level == level && event.message == message)
        }
    }

    impl<S: Subscriber> Layer<S> for BatchCapture {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            let mut sizes = SizeVisitor(Vec::new());
            attrs.record(&mut sizes);
            self.spans
                .lock()
                .expect("span capture poisoned")
                .push(CapturedSpan {
                    name: attrs.metadata().name(),
                    sizes: sizes.0,
                });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut message = MessageVisitor(None);
            event.record(&mut message);
            if let Some(message) = message.0 {
                self.events
                    .lock()
                    .expect("event capture poisoned")
                    .push(CapturedEvent {
                        level: *event.metadata().level(),
                        message,
                    });
            }
        }
    }

    /// Keeps the unsigned fields and drops everything else.
    struct SizeVisitor(Vec<(&'static str, u64)>);

    impl Visit for SizeVisitor {
        fn record_u64(&mut self, field: &Field, value: u64) {
            self.0.push((field.name(), value));
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
    }

    /// Keeps only the rendered `message` field of an event.
    struct MessageVisitor(Option<String>);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::BatchCapture;
        use tracing::Level;
        use tracing_subscriber::layer::SubscriberExt;

        #[test]
        fn captures_span_sizes_and_event_messages() {
            let capture = BatchCapture::default();
            let subscriber = tracing_subscriber::registry().with(capture.clone());
            tracing::subscriber::with_default(subscriber, || {
                let span = tracing::debug_span!("op.batch", items = 3_u64, label = "ignored");
                let _guard = span.enter();
                tracing::debug!("batch complete");
            });

            assert_eq!(capture.span_size("op.batch", "items"), Some(3));
            assert_eq!(capture.span_size("op.batch", "label"), None);
            assert_eq!(capture.span_size("op.other", "items"), None);
            assert!(capture.has_message(Level::DEBUG, "batch complete"));
            assert!(!capture.has_message(Level::INFO, "batch complete"));
        }
    }
}
