//! Message content pools and random selection

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::config::ContentConfig;

/// Built-in message bodies
pub const BUILTIN_BODIES: [&str; 50] = [
    "Just thinking about you makes me smile. 😊",
    "You’re the best thing that ever happened to me. 💖",
    "I don’t need a reason to miss you—I just do. All the time.",
    "You’re my favorite notification. 📱❤️",
    "If I had to choose between you and chocolate, I’d choose you… after eating the chocolate. 😘",
    "You’re like a cozy blanket for my soul.",
    "I love the way you make ordinary moments feel magical.",
    "You’re my favorite daydream.",
    "Life is so much better with you in it.",
    "I’d rather have a bad day with you than a good day with anyone else.",
    "You’re my happy place. 🌸",
    "I don’t just miss you—I miss the way you make me feel.",
    "You’re the reason I believe in love.",
    "I could never get tired of loving you.",
    "My heart does a little dance every time I see your name pop up on my phone. 💃",
    "You’re the human version of sunshine. ☀️",
    "I love you more than yesterday, but less than tomorrow.",
    "You make my heart skip a beat—and not just because you scare me sometimes. 😆",
    "I don’t need a thousand wishes—I already have you.",
    "You’re my favorite adventure.",
    "Being with you feels like coming home.",
    "I love you more than pizza… and that’s saying a lot. 🍕",
    "You’re the missing piece to my puzzle.",
    "Every love song reminds me of you.",
    "I fall for you more every single day.",
    "You’re my favorite kind of chaos.",
    "I love the way you understand me without me having to say a word.",
    "You’re my favorite person to do nothing with.",
    "I don’t just love you—I really, really like you.",
    "You’re the reason I believe in soulmates.",
    "I could get lost in your eyes forever.",
    "You’re my favorite thought.",
    "Loving you is the easiest thing I’ve ever done.",
    "You make my heart feel full.",
    "I love the way you laugh at my terrible jokes.",
    "You’re my favorite distraction.",
    "I don’t need a genie—I already have everything I want in you.",
    "You’re my favorite kind of beautiful.",
    "I love the way you make even the simplest moments special.",
    "You’re my favorite reason to smile.",
    "I love you more than coffee… and that’s serious. ☕",
    "You’re my favorite sound, my favorite sight, my favorite everything.",
    "I’d choose you over sleep… and I *really* love sleep. 😴❤️",
    "You make my heart feel like it’s on a trampoline—bouncy and happy.",
    "I love the way you fit perfectly into my arms.",
    "You’re my favorite kind of trouble.",
    "I love you more than words can say… but I’ll keep trying anyway.",
    "You’re my favorite kind of magic.",
    "I love the way you make my heart race just by being you.",
    "No matter what happens, I’ll always choose you—again and again.",
];

/// Built-in message titles
pub const BUILTIN_TITLES: [&str; 10] = [
    "💌 A Special Message For You!",
    "✨ You're Magical!",
    "🥰 My Heart Skips a Beat",
    "🌹 Thinking of You",
    "💖 Love Alert!",
    "🌟 You Shine Bright",
    "🤗 Virtual Hug Incoming",
    "😘 Sending You Kisses",
    "💕 You're My Favorite",
    "🌈 My Personal Sunshine",
];

/// Immutable, non-empty title and body pools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePool {
    titles: Vec<String>,
    bodies: Vec<String>,
}

impl MessagePool {
    pub fn builtin() -> Self {
        Self {
            titles: BUILTIN_TITLES.iter().map(|s| s.to_string()).collect(),
            bodies: BUILTIN_BODIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Configured pools replace the built-in ones; an empty list keeps the
    /// built-in pool for that field.
    pub fn from_config(config: &ContentConfig) -> Self {
        let builtin = Self::builtin();
        Self {
            titles: if config.titles.is_empty() {
                builtin.titles
            } else {
                config.titles.clone()
            },
            bodies: if config.bodies.is_empty() {
                builtin.bodies
            } else {
                config.bodies.clone()
            },
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Picks message content, falling back to a uniformly random pool entry.
///
/// The RNG sits behind a mutex; draws from concurrent requests are
/// serialized but otherwise unordered.
#[derive(Debug)]
pub struct ContentSelector {
    pool: MessagePool,
    rng: Mutex<StdRng>,
}

impl ContentSelector {
    /// OS-seeded selector
    pub fn new(pool: MessagePool) -> Self {
        Self {
            pool,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic selector
    pub fn with_seed(pool: MessagePool, seed: u64) -> Self {
        Self {
            pool,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn pool(&self) -> &MessagePool {
        &self.pool
    }

    pub fn title(&self, explicit: Option<&str>) -> String {
        self.choose(explicit, self.pool.titles())
    }

    pub fn body(&self, explicit: Option<&str>) -> String {
        self.choose(explicit, self.pool.bodies())
    }

    /// `explicit` unchanged when non-empty, otherwise a random entry of `pool`
    pub fn choose(&self, explicit: Option<&str>, pool: &[String]) -> String {
        if let Some(value) = explicit.filter(|v| !v.is_empty()) {
            return value.to_string();
        }

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool.choose(&mut *rng).cloned().unwrap_or_default()
    }
}
