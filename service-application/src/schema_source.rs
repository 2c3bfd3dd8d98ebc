use crate::{error::AppError, service::Service};
use service_domain::schema::Schema;
use std::sync::Arc;

/// schema 来源
///
/// - 负责按服务类型给出其声明的 schema；
/// - 框架可提供不同实现（如直接读取类型声明、进程内注册表等）；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
pub trait SchemaSource {
    fn schema_for<S: Service>(&self) -> Result<Arc<dyn Schema>, AppError>;
}

/// 直接使用服务类型自身的声明（`Service::schema`）
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredSchemas;

impl SchemaSource for DeclaredSchemas {
    fn schema_for<S: Service>(&self) -> Result<Arc<dyn Schema>, AppError> {
        Ok(S::schema().build())
    }
}
