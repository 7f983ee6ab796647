//! Built-in starter catalog
//!
//! A small set of ready-made artifacts so category, featured, and recent
//! queries have content before the first generation runs.

use crate::types::{ArtifactMetadata, Category, NewArtifact};

fn entry(name: &str, description: &str, category: Category, features: &[&str]) -> NewArtifact {
    NewArtifact {
        name: name.to_string(),
        description: description.to_string(),
        category,
        body: String::new(),
        metadata: ArtifactMetadata {
            features: features.iter().map(|f| f.to_string()).collect(),
            ..ArtifactMetadata::default()
        },
    }
}

/// The default catalog installed by [`crate::ArtifactStore::with_catalog`]
#[must_use]
pub fn default_catalog() -> Vec<NewArtifact> {
    vec![
        entry(
            "Smart PDF Merger",
            "Merge PDFs with intelligent page ordering",
            Category::Pdf,
            &["drag-and-drop ordering", "bookmark preservation"],
        ),
        entry(
            "OCR Text Extractor",
            "Extract text from images and scanned PDFs",
            Category::Pdf,
            &["multi-language OCR", "layout retention"],
        ),
        entry(
            "Auto Subtitle Generator",
            "Generate accurate subtitles from speech",
            Category::Video,
            &["speaker detection", "SRT export"],
        ),
        entry(
            "Image Upscaler Pro",
            "Enhance image resolution without artifacts",
            Category::Image,
            &["4x upscaling", "batch mode"],
        ),
        entry(
            "Smart Data Analyzer",
            "Analyze datasets and surface insights",
            Category::Ai,
            &["CSV import", "trend detection"],
        ),
        entry(
            "Excel Formula Generator",
            "Turn plain-language descriptions into formulas",
            Category::Productivity,
            &["formula explanation", "error checking"],
        ),
        entry(
            "Passphrase Vault",
            "Generate and store strong passphrases locally",
            Category::Security,
            &["offline storage", "strength meter"],
        ),
        entry(
            "Regex Workbench",
            "Build and test regular expressions interactively",
            Category::Developer,
            &["live match preview", "pattern library"],
        ),
    ]
}
