use crate::{
    common::error::AppError,
    store::{
        document_store::DocumentStore,
        models::{Query, to_fields},
    },
    system_log::models::{SYSTEM_LOG_COLLECTION, SystemLog},
};

pub async fn create_system_log(store: &dyn DocumentStore, entry: &SystemLog) -> Result<(), AppError> {
    let fields = to_fields(entry)?;
    store.add(SYSTEM_LOG_COLLECTION, fields).await?;
    Ok(())
}

pub async fn list_system_logs(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> Result<Vec<SystemLog>, AppError> {
    let query = Query::new().order_desc("createdAt").limit_opt(limit);
    let rows = store.list(SYSTEM_LOG_COLLECTION, &query).await?;

    let logs = rows
        .iter()
        .map(|row| row.decode::<SystemLog>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(logs)
}
