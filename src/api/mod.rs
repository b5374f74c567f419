use rocket::Route;

mod evaluation;
mod field_pool;

pub use evaluation::Evaluations;
pub use field_pool::FieldPools;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(field_pool::routes());
    routes.extend(evaluation::routes());
    routes
}
