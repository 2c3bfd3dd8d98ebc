use crate::error::AppError;

/// 业务逻辑块的结果
///
/// - `bool`：原样作为成败；
/// - `()`：视为未报告成功；
/// - `Option<T>`：有值即成功；
/// - `Result<T, E>`：`Err` 作为错误向上传播，`Ok` 取内部结果。
pub trait Outcome {
    fn into_outcome(self) -> Result<bool, AppError>;
}

impl Outcome for bool {
    fn into_outcome(self) -> Result<bool, AppError> {
        Ok(self)
    }
}

impl Outcome for () {
    fn into_outcome(self) -> Result<bool, AppError> {
        Ok(false)
    }
}

impl<T> Outcome for Option<T> {
    fn into_outcome(self) -> Result<bool, AppError> {
        Ok(self.is_some())
    }
}

impl<T, E> Outcome for Result<T, E>
where
    T: Outcome,
    E: Into<AppError>,
{
    fn into_outcome(self) -> Result<bool, AppError> {
        self.map_err(Into::into)?.into_outcome()
    }
}
