//! Random choices made for one generation request.
//!
//! Everything random is drawn up front into a [`GenerationPlan`] so the
//! async part of the request holds no RNG and tests can supply a fixed plan.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

/// Prompts the generator picks from, uniformly.
pub const TOPICS: &[&str] = &[
    "Write a blog post about new features in Svelte 5 that developers will love",
    "Explain the top 5 PocketBase features that make it great for rapid development",
    "Write a tutorial on how to use Svelte 5's runes with PocketBase",
    "Create a blog post about PocketBase hooks and when to use them",
    "Write about Svelte 5's performance improvements compared to previous versions",
    "Explain how to implement real-time features with PocketBase and Svelte",
    "Create a post about authentication best practices with PocketBase",
];

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 15;

/// Where placeholder images come from and how many a post may get.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub base_url: String,
    pub max_count: usize,
    pub width: std::ops::RangeInclusive<u32>,
    pub height: std::ops::RangeInclusive<u32>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            base_url: "https://picsum.photos".to_string(),
            max_count: 4,
            width: 400..=1200,
            height: 300..=800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub topic: String,
    pub image_urls: Vec<String>,
}

impl GenerationPlan {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, images: &ImageOptions) -> Self {
        let topic = TOPICS
            .choose(rng)
            .copied()
            .unwrap_or(TOPICS[0])
            .to_string();
        let count = rng.gen_range(0..=images.max_count);
        let image_urls = (0..count).map(|_| image_url(rng, images)).collect();
        Self { topic, image_urls }
    }
}

fn image_url<R: Rng + ?Sized>(rng: &mut R, images: &ImageOptions) -> String {
    let seed: String = (0..10).map(|_| char::from(rng.sample(Alphanumeric))).collect();
    let width = rng.gen_range(images.width.clone());
    let height = rng.gen_range(images.height.clone());
    format!(
        "{}/seed/{}/{}/{}",
        images.base_url.trim_end_matches('/'),
        seed,
        width,
        height
    )
}

/// A fresh record id: 15 lowercase alphanumeric characters.
pub fn new_record_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
