//! services/app/src/adapters/report.rs
//!
//! This module contains the lost-report adapter. It implements the
//! `ReportService` port by posting the photo and form as `multipart/form-data`
//! to `/lost-reports`.

use async_trait::async_trait;
use pawtrack_core::domain::{CreatedReport, ReportFormData};
use pawtrack_core::ports::{PortResult, ReportService};
use serde::Deserialize;
use tracing::{error, info};

use super::upload::{
    as_submission_error, multipart_form, ImageUpload, SubmissionClient, SubmissionContext,
};

/// An adapter that implements the `ReportService` port.
#[derive(Clone)]
pub struct HttpReportAdapter {
    submitter: SubmissionClient,
}

impl HttpReportAdapter {
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
    report: CreatedId,
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    id: String,
}

/// The text parts of a lost-report submission, in the order they are sent.
pub fn report_fields(form: &ReportFormData, ctx: &SubmissionContext) -> Vec<(&'static str, String)> {
    vec![
        ("pet_name", form.pet_name.clone()),
        ("species", form.species.clone()),
        ("breed", form.breed.clone()),
        ("description", form.description.clone()),
        ("lost_date", form.lost_date.format("%Y-%m-%d").to_string()),
        ("last_seen_location_text", form.last_seen_location_text.clone()),
        ("user_id", ctx.user_id.clone()),
        ("contactInfo", form.contact_info.clone()),
        ("status", form.report_type.as_str().to_string()),
        ("push_token", ctx.push_token.clone()),
    ]
}

#[async_trait]
impl ReportService for HttpReportAdapter {
    async fn create_report(
        &self,
        image_uri: &str,
        form: &ReportFormData,
    ) -> PortResult<CreatedReport> {
        let ctx = self.submitter.context("report").await?;
        let image = ImageUpload::prepare(image_uri, "report");
        info!(file = %image.file_name, "Publishing lost report");

        let result: PortResult<CreatedReport> = async {
            let fields = report_fields(form, &ctx);
            let body = multipart_form(image.into_part().await?, fields);
            let created: CreatedBody = self.submitter.submit("/lost-reports", body, &ctx).await?;
            Ok(CreatedReport {
                report_id: created.data.report.id,
            })
        }
        .await;

        result.map_err(|e| {
            let e = as_submission_error(e);
            error!("Lost report was not published: {}", e);
            e
        })
    }
}
