use recycling_site_service::api;
use recycling_site_service::common::init;
use recycling_site_service::settings::AppSettings;
use recycling_site_service::workers::create_operator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "create-operator" => create_operator::serve(settings).await,
        _ => panic!("Unknown app component"),
    }
}
