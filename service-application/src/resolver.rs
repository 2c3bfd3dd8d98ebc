//! schema 解析（SchemaResolver）
//!
//! 取得服务类型的 schema，并注入由上下文派生的选项。
//!
use crate::{error::AppError, schema_source::SchemaSource, service::Service};
use service_domain::schema::BoundSchema;

/// 解析服务 `S` 的 schema 并绑定上下文选项
pub fn resolve<S, R>(source: &R, context: &S::Context) -> Result<BoundSchema, AppError>
where
    S: Service,
    R: SchemaSource,
{
    let schema = source.schema_for::<S>()?;
    let options = S::options_for_context(context)?;
    tracing::trace!(
        service = S::NAME,
        option_keys = ?options.keys().collect::<Vec<_>>(),
        "schema resolved"
    );
    Ok(BoundSchema::new(schema, options))
}
