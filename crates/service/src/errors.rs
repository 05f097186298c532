use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// 存储不可用：权限不足、超出配额或存储本身缺失/损坏
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn quota_exceeded(needed: u64, quota: u64) -> Self {
        Self::StorageUnavailable(format!("quota exceeded: {needed} bytes needed, {quota} allowed"))
    }
}
