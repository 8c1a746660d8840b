use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SourceResult;

use super::{
    hype::calculate_hype, numeric::parse_count, published_at::format_published_at,
    raw::RawVideoRecord, source::VideoDataSource,
};

/// Public contract served to the frontend. Nothing else from the raw record
/// is ever exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVideo {
    pub thumbnail: String,
    pub title: String,
    pub author: String,
    pub published_at: String,
    pub hype: f64,
}

impl RankedVideo {
    /// Missing fields fall back to empty strings; counters go through
    /// [`parse_count`]. Only an absent or `null` comment count disables
    /// scoring.
    pub fn from_record(record: &RawVideoRecord, now: DateTime<Utc>) -> Self {
        let title = record.title().unwrap_or_default().to_string();
        let views = parse_count(record.view_count());
        let likes = parse_count(record.like_count());
        let comments = record.comment_count().map(|raw| parse_count(Some(raw)));

        Self {
            thumbnail: record.thumbnail_url().unwrap_or_default().to_string(),
            author: record.channel_title().unwrap_or_default().to_string(),
            published_at: format_published_at(record.published_at().unwrap_or_default(), now),
            hype: calculate_hype(&title, views, likes, comments),
            title,
        }
    }
}

/// Maps every record and sorts the result by hype, highest first. Ties keep
/// their source order.
pub fn rank_records(records: &[RawVideoRecord], now: DateTime<Utc>) -> Vec<RankedVideo> {
    let mut ranked: Vec<RankedVideo> = records
        .iter()
        .map(|record| RankedVideo::from_record(record, now))
        .collect();
    ranked.sort_by(|left, right| right.hype.total_cmp(&left.hype));
    ranked
}

#[derive(Clone)]
pub struct VideoRankingPipeline {
    source: Arc<VideoDataSource>,
}

impl VideoRankingPipeline {
    pub fn new(source: Arc<VideoDataSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self) -> SourceResult<Vec<RankedVideo>> {
        self.execute_at(Utc::now()).await
    }

    /// Same as [`Self::execute`] with an explicit clock for relative ages.
    pub async fn execute_at(&self, now: DateTime<Utc>) -> SourceResult<Vec<RankedVideo>> {
        let records = self.source.get_videos().await?;
        Ok(rank_records(&records, now))
    }
}
