use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::payment_submissions::{
    InsertPaymentSubmissionEntity, PaymentSubmissionEntity,
};

/// The external record store: one insert per successful submission, nothing else.
#[async_trait]
#[automock]
pub trait PaymentSubmissionRepository {
    async fn insert_submission(
        &self,
        submission: InsertPaymentSubmissionEntity,
    ) -> Result<PaymentSubmissionEntity>;
}
