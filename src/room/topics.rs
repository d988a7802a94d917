use rand::Rng;

pub const PREDEFINED_TOPICS: &[&str] = &[
    "Apple", "Banana", "Car", "Dog", "Elephant", "Flower", "Guitar", "House", "Ice Cream",
    "Jacket", "Kite", "Lion", "Moon", "Ninja", "Octopus", "Pizza", "Queen", "Robot", "Sun",
    "Tree", "Umbrella", "Volcano", "Watch", "Xylophone", "Yacht", "Zebra", "Book", "Chair",
    "Cloud", "Dragon", "Fish", "Ghost",
];

/// Chooses the topic for a new round
pub trait TopicPicker: Send + Sync {
    fn pick(&self, previous: Option<&str>) -> String;
}

/// Uniform choice over [`PREDEFINED_TOPICS`] that never repeats the previous topic
#[derive(Debug, Default)]
pub struct RandomTopicPicker;

impl TopicPicker for RandomTopicPicker {
    fn pick(&self, previous: Option<&str>) -> String {
        let skipped = previous.and_then(|p| PREDEFINED_TOPICS.iter().position(|t| *t == p));
        let span = PREDEFINED_TOPICS.len() - usize::from(skipped.is_some());

        // Draw from the vocabulary minus the skipped slot, then shift past it
        let mut index = rand::rng().random_range(0..span);
        if skipped.is_some_and(|skip| index >= skip) {
            index += 1;
        }
        PREDEFINED_TOPICS[index].to_string()
    }
}

/// Always returns the same topic, for tests and demos
#[derive(Debug, Clone)]
pub struct FixedTopicPicker {
    topic: String,
}

impl FixedTopicPicker {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl TopicPicker for FixedTopicPicker {
    fn pick(&self, _previous: Option<&str>) -> String {
        self.topic.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_size() {
        assert!(PREDEFINED_TOPICS.len() >= 30);
        let unique: HashSet<_> = PREDEFINED_TOPICS.iter().collect();
        assert_eq!(unique.len(), PREDEFINED_TOPICS.len());
    }

    #[test]
    fn test_random_topic_comes_from_vocabulary() {
        let picker = RandomTopicPicker;
        for _ in 0..100 {
            let topic = picker.pick(None);
            assert!(PREDEFINED_TOPICS.contains(&topic.as_str()));
        }
    }

    #[test]
    fn test_previous_topic_not_repeated() {
        let picker = RandomTopicPicker;
        for _ in 0..200 {
            assert_ne!(picker.pick(Some("Robot")), "Robot");
        }
    }

    #[test]
    fn test_edge_topics_never_repeat_and_stay_in_vocabulary() {
        let picker = RandomTopicPicker;
        let first = PREDEFINED_TOPICS[0];
        let last = PREDEFINED_TOPICS[PREDEFINED_TOPICS.len() - 1];

        for previous in [first, last] {
            for _ in 0..200 {
                let topic = picker.pick(Some(previous));
                assert_ne!(topic, previous);
                assert!(PREDEFINED_TOPICS.contains(&topic.as_str()));
            }
        }
    }

    #[test]
    fn test_unknown_previous_topic_draws_whole_vocabulary() {
        let picker = RandomTopicPicker;
        let seen: HashSet<String> = (0..2000).map(|_| picker.pick(Some("Spaceship"))).collect();

        assert!(seen.iter().all(|t| PREDEFINED_TOPICS.contains(&t.as_str())));
        assert!(seen.len() > PREDEFINED_TOPICS.len() / 2);
    }

    #[test]
    fn test_fixed_picker() {
        let picker = FixedTopicPicker::new("Ghost");
        assert_eq!(picker.pick(Some("Ghost")), "Ghost");
    }
}
