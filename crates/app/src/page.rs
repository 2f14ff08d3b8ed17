use axum::response::Html;

use idpage_storage::{QueryError, QueryExecutor};

use crate::example::ExampleService;

/// Renders the home page with the id of the first record returned by the service.
///
/// The service is called exactly once. Failures are returned as-is and no
/// partial markup is produced.
pub async fn render_home_page<Q: QueryExecutor>(
    service: &ExampleService<Q>,
) -> Result<Html<String>, QueryError> {
    let example = service.get_example().await?;
    let record = example
        .into_iter()
        .next()
        .ok_or(QueryError::Database(sqlx::Error::RowNotFound))?;

    Ok(Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>idpage</title></head>\n\
         <body>\n\
         <main>\n\
         <div>ID: {}</div>\n\
         </main>\n\
         </body>\n\
         </html>\n",
        escape_html(&record.id)
    )))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
