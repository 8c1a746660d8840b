use super::numeric::non_negative_finite;

const TUTORIAL_KEYWORD: &str = "tutorial";
const TUTORIAL_MULTIPLIER: f64 = 2.0;

/// Ranking score: `(likes + comments) / views`, doubled when the title
/// mentions "tutorial" in any casing.
///
/// Zero views means zero hype. `comments == None` (the source had no comment
/// data at all) also means zero hype, while `Some(0.0)` still scores.
pub fn calculate_hype(title: &str, views: f64, likes: f64, comments: Option<f64>) -> f64 {
    let views = non_negative_finite(views);
    if views == 0.0 {
        return 0.0;
    }
    let Some(comments) = comments else {
        return 0.0;
    };

    let likes = non_negative_finite(likes);
    let comments = non_negative_finite(comments);

    let mut hype = (likes + comments) / views;
    if title.to_lowercase().contains(TUTORIAL_KEYWORD) {
        hype *= TUTORIAL_MULTIPLIER;
    }
    non_negative_finite(hype)
}
