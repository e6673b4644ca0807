//! services/app/src/adapters/sighting.rs
//!
//! This module contains the sighting adapter, which implements the
//! `SightingService` port by posting to `/sighting-reports`.

use async_trait::async_trait;
use chrono::SecondsFormat;
use pawtrack_core::domain::{CreatedSighting, SightingFormData};
use pawtrack_core::ports::{PortResult, SightingService};
use serde::Deserialize;
use tracing::{error, info};

use super::upload::{
    as_submission_error, multipart_form, ImageUpload, SubmissionClient, SubmissionContext,
};

/// An adapter that implements the `SightingService` port.
#[derive(Clone)]
pub struct HttpSightingAdapter {
    submitter: SubmissionClient,
}

impl HttpSightingAdapter {
    pub fn new(submitter: SubmissionClient) -> Self {
        Self { submitter }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    data: CreatedData,
}

#[derive(Debug, Deserialize)]
struct CreatedData {
    sighting: CreatedId,
    #[serde(default)]
    matches_found: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    id: String,
}

/// The text parts of a sighting submission. The date goes out as a full
/// UTC timestamp with millisecond precision.
pub fn sighting_fields(
    form: &SightingFormData,
    ctx: &SubmissionContext,
) -> Vec<(&'static str, String)> {
    vec![
        (
            "sighting_date",
            form.sighting_date.to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        ("description", form.description.clone()),
        ("location_text", form.location_text.clone()),
        ("status", form.status.as_str().to_string()),
        ("user_id", ctx.user_id.clone()),
        ("push_token", ctx.push_token.clone()),
    ]
}

#[async_trait]
impl SightingService for HttpSightingAdapter {
    async fn create_sighting(
        &self,
        image_uri: &str,
        form: &SightingFormData,
    ) -> PortResult<CreatedSighting> {
        let ctx = self.submitter.context("sighting").await?;
        let image = ImageUpload::prepare(image_uri, "sighting");
        info!(uri = %image.uri, "Sending sighting");

        let result: PortResult<CreatedSighting> = async {
            let body = multipart_form(image.into_part().await?, sighting_fields(form, &ctx));
            let created: CreatedBody = self
                .submitter
                .submit("/sighting-reports", body, &ctx)
                .await?;
            Ok(CreatedSighting {
                sighting_id: created.data.sighting.id,
                matches_found: created.data.matches_found,
            })
        }
        .await;

        result.map_err(|e| {
            let e = as_submission_error(e);
            error!("Sighting was not published: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pawtrack_core::domain::SightingStatus;

    #[test]
    fn sighting_date_is_a_full_utc_timestamp() {
        let form = SightingFormData {
            sighting_date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            location_text: "Yanahuara".into(),
            status: SightingStatus::InShelter,
            ..SightingFormData::default()
        };
        let ctx = SubmissionContext {
            access_token: "token".into(),
            user_id: "u".into(),
            push_token: "ExponentPushToken[abc]".into(),
        };

        let fields = sighting_fields(&form, &ctx);
        assert_eq!(fields[0], ("sighting_date", "2024-03-05T10:00:00.000Z".to_string()));
        assert!(fields.contains(&("status", "En_Albergue".to_string())));
        assert!(fields.contains(&("push_token", "ExponentPushToken[abc]".to_string())));
        assert!(fields.contains(&("description", String::new())));
    }
}
