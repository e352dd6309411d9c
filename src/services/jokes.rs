use super::JokeService;
use rand::seq::SliceRandom;

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "A SQL query walks into a bar, walks up to two tables and asks, can I join you?",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "Why did the developer go broke? Because he used up all his cache.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "An optimist says the glass is half full. A pessimist says it is half empty. A programmer says the glass is twice as large as necessary.",
    "There are only two hard things in computer science: cache invalidation, naming things, and off-by-one errors.",
    "Knock knock. Race condition. Who's there?",
    "A programmer's spouse says: buy a loaf of bread, and if they have eggs, buy a dozen. The programmer comes home with twelve loaves.",
    "Why was the function feeling sad? It didn't get a callback.",
    "My code doesn't have bugs. It just develops random undocumented features.",
    "Why did the programmer quit his job? Because he didn't get arrays.",
];

/// Built-in collection of programmer jokes
#[derive(Debug, Clone)]
pub struct JokeBook {
    jokes: Vec<String>,
}

impl JokeBook {
    pub fn new() -> Self {
        Self {
            jokes: JOKES.iter().map(|joke| joke.to_string()).collect(),
        }
    }

    /// A joke book with a custom collection; an empty list falls back to the built-in one
    pub fn with_jokes(jokes: Vec<String>) -> Self {
        if jokes.is_empty() {
            return Self::new();
        }
        Self { jokes }
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }
}

impl Default for JokeBook {
    fn default() -> Self {
        Self::new()
    }
}

impl JokeService for JokeBook {
    fn joke(&self) -> String {
        self.jokes
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
