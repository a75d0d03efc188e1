use std::{collections::HashMap, fmt};

/// Name of the event fired for every token that receives a location.
pub const LOCATION_EVENT: &str = "location";

pub type Listener<T> = Box<dyn FnMut(&T)>;

/// Minimal named-event registry. Listeners run synchronously, in the order
/// they were registered.
pub struct Emitter<T> {
    listeners: HashMap<String, Vec<Listener<T>>>,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(event, listeners)| (event.as_str(), listeners.len()))
            .collect();

        f.debug_struct("Emitter").field("listeners", &counts).finish()
    }
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: impl Into<String>, listener: impl FnMut(&T) + 'static) -> &mut Self {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(listener));
        self
    }

    /// Removes every listener for `event`, returning how many there were.
    pub fn off(&mut self, event: &str) -> usize {
        self.listeners
            .remove(event)
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    /// Calls every listener registered for `event`, returning how many ran.
    pub fn emit(&mut self, event: &str, payload: &T) -> usize {
        match self.listeners.get_mut(event) {
            Some(listeners) => {
                for listener in listeners.iter_mut() {
                    listener(payload);
                }
                tracing::trace!(event, listeners = listeners.len(), "emitted");
                listeners.len()
            }
            None => 0,
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map(Vec::len).unwrap_or(0)
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }
}
