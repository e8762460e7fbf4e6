// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt augmentation for interior/exterior design generation

/// Quality/style qualifiers appended to every prompt sent to the pipeline
pub const QUALITY_SUFFIX: &str =
    ", high quality, detailed, professional interior/exterior design, 4k, realistic, architecture";

/// Fixed negative prompt steering the pipeline away from low-quality artifacts
pub const NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, ugly, bad anatomy, text, watermark";

/// Append the quality suffix to a user prompt. The suffix is fixed and is
/// echoed back to the caller as `enhanced_prompt`.
pub fn enhance_prompt(prompt: &str) -> String {
    format!("{}{}", prompt, QUALITY_SUFFIX)
}
