//! Turns the free-form text a language model returns into a title and body.
//!
//! The model is asked for `{"title": ..., "body": ...}` but does not always
//! comply. Resolution walks an ordered list of pure strategies and keeps the
//! first one that produces a post.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Title used when none can be recovered from the text.
pub const FALLBACK_TITLE: &str = "Generated Post";

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fenced block regex"));

static BARE_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object regex"));

static FIRST_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^.!?]+[.!?])\s*").expect("valid sentence regex"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedPost {
    pub title: String,
    pub body: String,
}

type Strategy = fn(&str) -> Option<GeneratedPost>;

/// Tried in order; the last one always succeeds.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("schema", parse_whole),
    ("fenced_block", parse_fenced_block),
    ("bare_object", parse_bare_object),
    ("raw_body", raw_body_when_structured),
    ("first_sentence", split_first_sentence),
];

/// Resolves model output into a post, never failing.
pub fn resolve(text: &str) -> GeneratedPost {
    for (name, strategy) in STRATEGIES {
        if let Some(post) = strategy(text) {
            tracing::debug!(strategy = name, "resolved generated text");
            return post;
        }
    }
    GeneratedPost {
        title: FALLBACK_TITLE.to_string(),
        body: text.to_string(),
    }
}

/// Schema-conformant JSON; a blank title takes the fallback so the body survives.
fn parse_post(json: &str) -> Option<GeneratedPost> {
    let mut post: GeneratedPost = serde_json::from_str(json).ok()?;
    if post.title.trim().is_empty() {
        post.title = FALLBACK_TITLE.to_string();
    }
    Some(post)
}

fn parse_whole(text: &str) -> Option<GeneratedPost> {
    parse_post(text.trim())
}

fn parse_fenced_block(text: &str) -> Option<GeneratedPost> {
    let block = FENCED_BLOCK.captures(text)?.get(1)?.as_str();
    parse_post(block)
}

fn parse_bare_object(text: &str) -> Option<GeneratedPost> {
    let object = BARE_OBJECT.find(text)?.as_str();
    parse_post(object)
}

/// The text looks structured but nothing in it parsed: keep all of it as the body.
fn raw_body_when_structured(text: &str) -> Option<GeneratedPost> {
    if FENCED_BLOCK.is_match(text) || BARE_OBJECT.is_match(text) {
        Some(GeneratedPost {
            title: FALLBACK_TITLE.to_string(),
            body: text.trim().to_string(),
        })
    } else {
        None
    }
}

/// Plain prose: the first sentence becomes the title.
fn split_first_sentence(text: &str) -> Option<GeneratedPost> {
    match FIRST_SENTENCE.captures(text) {
        Some(caps) => {
            let whole = caps.get(0)?;
            let sentence = caps.get(1)?;
            Some(GeneratedPost {
                title: sentence.as_str().trim().to_string(),
                body: text[whole.end()..].trim().to_string(),
            })
        }
        None => Some(GeneratedPost {
            title: FALLBACK_TITLE.to_string(),
            body: text.to_string(),
        }),
    }
}
