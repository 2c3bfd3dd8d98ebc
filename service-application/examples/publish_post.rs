use serde::Deserialize;
use serde_json::json;
use service_application::context::ActorContext;
use service_application::error::AppError;
use service_application::{InMemorySchemaRegistry, Service, ServiceInstance};
use service_domain::schema::SchemaDeclaration;
use tracing_subscriber::EnvFilter;

struct PublishPost;

#[derive(Debug, Deserialize)]
struct PublishPostInput {
    title: String,
    author: String,
    tags: Option<Vec<String>>,
}

impl Service for PublishPost {
    const NAME: &'static str = "publish_post";
    type Context = ActorContext;

    fn schema() -> SchemaDeclaration {
        SchemaDeclaration::Rules(|s| {
            s.required("title").filled().str().min_size(3);
            s.required("author")
                .filled()
                .rule("is_current_actor", |v, o| {
                    o.pointer("/current_context/actor_name") == Some(v)
                });
            s.optional("tags").array().max_size(5);
            s.message("is_current_actor", "must be the current actor");
        })
    }

    fn execute(service: &mut ServiceInstance<'_, Self>) -> Result<(), AppError> {
        service.run(|svc| -> Result<bool, AppError> {
            let Some(input) = svc.inputs_as::<PublishPostInput>()? else {
                return Ok(false);
            };
            if input.title.eq_ignore_ascii_case("draft") {
                svc.add_errors([("title", "cannot publish a draft")])?;
                return Ok(false);
            }
            println!(
                "published {:?} by {} with {} tag(s)",
                input.title,
                input.author,
                input.tags.map_or(0, |t| t.len())
            );
            Ok(true)
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let registry = InMemorySchemaRegistry::new();
    registry.register::<PublishPost>();

    let ctx = ActorContext::builder()
        .maybe_actor_type(Some("user".into()))
        .maybe_actor_id(Some("u-1".into()))
        .maybe_actor_name(Some("alice".into()))
        .maybe_correlation_id(Some("cor-1".into()))
        .build();

    let inputs = [
        json!({"title": "Hello world", "author": "alice", "tags": ["intro"]}),
        json!({"title": "Hi", "author": "bob"}),
        json!({"title": "draft", "author": "alice"}),
    ];

    for raw in inputs {
        let mut service = ServiceInstance::<PublishPost>::with_source(&registry, &ctx, raw)?;
        service.execute()?;
        println!(
            "success={} status={} errors={}",
            service.is_success(),
            service.status(),
            service.errors().to_json()
        );
    }

    Ok(())
}
