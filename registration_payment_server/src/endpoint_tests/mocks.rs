use mockall::mock;
use registration_payment_engine::{
    db_types::{NewPaymentRecord, NewRegistration, OrderId, PaymentRecord, PaymentUpdate, TeamRecord},
    traits::{ReconciliationStore, StorageError},
};

mock! {
    pub ReconciliationDb {}
    impl ReconciliationStore for ReconciliationDb {
        fn url(&self) -> &str;
        async fn upsert_payment_by_order_id(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, StorageError>;
        async fn update_payment_by_order_id(&self, update: PaymentUpdate) -> Result<Option<PaymentRecord>, StorageError>;
        async fn insert_team_with_payment(&self, registration: NewRegistration, payment: Option<NewPaymentRecord>) -> Result<TeamRecord, StorageError>;
        async fn mark_team_paid(&self, team_id: i64) -> Result<bool, StorageError>;
        async fn fetch_team(&self, team_id: i64) -> Result<Option<TeamRecord>, StorageError>;
        async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, StorageError>;
        async fn close(&self) -> Result<(), StorageError>;
    }
}
