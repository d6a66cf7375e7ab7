use std::collections::HashMap;

/// Issues sequential ids per entity type. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counters: HashMap<String, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, kind: &str) -> u64 {
        match self.counters.get_mut(kind) {
            Some(counter) => {
                *counter += 1;
                *counter
            }
            None => {
                self.counters.insert(kind.to_string(), 1);
                1
            }
        }
    }
}
