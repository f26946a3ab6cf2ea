use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, SelectableHelper, insert_into};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::payment_submissions::{InsertPaymentSubmissionEntity, PaymentSubmissionEntity},
        repositories::payment_submissions::PaymentSubmissionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::payment_submissions},
};

pub struct PaymentSubmissionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentSubmissionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentSubmissionRepository for PaymentSubmissionPostgres {
    async fn insert_submission(
        &self,
        submission: InsertPaymentSubmissionEntity,
    ) -> Result<PaymentSubmissionEntity> {
        // r2d2 checkout and the insert both block, keep them off the runtime threads
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<PaymentSubmissionEntity> {
            let mut conn = db_pool.get()?;

            let stored = insert_into(payment_submissions::table)
                .values(&submission)
                .returning(PaymentSubmissionEntity::as_returning())
                .get_result::<PaymentSubmissionEntity>(&mut conn)?;

            Ok(stored)
        })
        .await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::{
        PgConnection,
        r2d2::{ConnectionManager, Pool},
    };
    use std::time::Duration;

    fn submission() -> InsertPaymentSubmissionEntity {
        InsertPaymentSubmissionEntity {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            card_last_four: "1111".to_string(),
            card_type: Some("visa".to_string()),
            purchase_amount: 2.5,
        }
    }

    // Nothing listens on port 1, so checkout keeps failing until the pool timeout.
    #[tokio::test]
    async fn waiting_for_a_connection_does_not_stall_the_runtime() {
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(500))
            .build_unchecked(ConnectionManager::<PgConnection>::new(
                "postgres://127.0.0.1:1/payments",
            ));
        let repository = PaymentSubmissionPostgres::new(Arc::new(pool));

        let timer_fired_first = tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)) => true,
            _ = repository.insert_submission(submission()) => false,
        };
        assert!(timer_fired_first);
    }

    #[tokio::test]
    async fn unreachable_database_is_an_error() {
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(ConnectionManager::<PgConnection>::new(
                "postgres://127.0.0.1:1/payments",
            ));
        let repository = PaymentSubmissionPostgres::new(Arc::new(pool));

        assert!(repository.insert_submission(submission()).await.is_err());
    }
}
