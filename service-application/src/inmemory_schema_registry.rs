use crate::{error::AppError, schema_source::SchemaSource, service::Service};
use dashmap::DashMap;
use service_domain::schema::{Schema, SchemaDeclaration};
use std::any::TypeId;
use std::sync::Arc;

/// 基于内存的 schema 注册表
/// - 通过 TypeId 登记不同 Service 对应的 schema
/// - 一般在程序初始化时填充，此后只读
/// - 同一类型重复登记时以最近一次为准
pub struct InMemorySchemaRegistry {
    schemas: DashMap<TypeId, (&'static str, Arc<dyn Schema>)>,
}

impl Default for InMemorySchemaRegistry {
    fn default() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记服务类型自身声明的 schema
    pub fn register<S: Service>(&self) {
        self.register_with::<S>(S::schema());
    }

    /// 以给定声明登记（覆盖已有登记）
    pub fn register_with<S: Service>(&self, declaration: SchemaDeclaration) {
        let previous = self
            .schemas
            .insert(TypeId::of::<S>(), (S::NAME, declaration.build()));
        if previous.is_some() {
            tracing::debug!(service = S::NAME, "schema re-registered, previous declaration replaced");
        } else {
            tracing::debug!(service = S::NAME, "schema registered");
        }
    }

    pub fn contains<S: Service>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<S>())
    }

    /// 清空全部登记（用于测试隔离）
    pub fn clear(&self) {
        self.schemas.clear();
    }

    /// 获取已登记的服务名列表（只读视图）
    pub fn registered_services(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.iter().map(|e| e.value().0).collect();
        names.sort_unstable();
        names
    }
}

impl SchemaSource for InMemorySchemaRegistry {
    fn schema_for<S: Service>(&self) -> Result<Arc<dyn Schema>, AppError> {
        let Some(schema) = self
            .schemas
            .get(&TypeId::of::<S>())
            .map(|e| e.value().1.clone())
        else {
            return Err(AppError::SchemaNotRegistered(S::NAME));
        };

        Ok(schema)
    }
}
