use clap::Parser;
use rate_quote::config::LogFormat;
use rate_quote::utils::{logger, validation::Validate};
use rate_quote::{
    ApiOverrides, CliConfig, ClientSettings, QuoteEngine, RateClient, RateError, TomlConfig,
};

fn fail(e: &RateError) -> ! {
    tracing::error!(
        "❌ Rate quote failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // API 錯誤沿用原本的輸出：狀態碼與原始回應內容
    if let Some(status) = e.status() {
        println!("Error: {}", status);
        println!("{}", e.raw_body().unwrap_or_default());
    } else if let RateError::ResponseParse { body, .. } = e {
        println!("Error: malformed response body");
        println!("{}", body);
    }

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting rate-quote CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail(&e);
    }

    // 檔案 < 環境變數 < 命令列
    let file_config = TomlConfig::from_file(&cli.config).unwrap_or_else(|e| fail(&e));
    let env_overrides = ApiOverrides::from_env().unwrap_or_else(|e| fail(&e));
    let (settings, rate_request) =
        ClientSettings::resolve(file_config, [env_overrides, cli.api_overrides()])
            .unwrap_or_else(|e| fail(&e));

    let client = RateClient::new(settings, rate_request).unwrap_or_else(|e| fail(&e));

    if cli.dump_request {
        if cli.reveal_credentials {
            tracing::warn!("🔓 Printing the bearer token in cleartext");
        }
        let preview = client
            .preview(cli.reveal_credentials)
            .unwrap_or_else(|e| fail(&e));
        println!("POST {}", preview.endpoint);
        for (name, value) in &preview.headers {
            println!("{}: {}", name, value);
        }
        println!();
        println!("{}", preview.payload);
        println!();
    }

    let engine = QuoteEngine::new(client);
    let report = engine.run().await.unwrap_or_else(|e| fail(&e));

    if cli.summary {
        print!("{}", report.render_summary());
    } else {
        let rendered = report.render_json().unwrap_or_else(|e| fail(&e));
        println!("{}", rendered);
    }
}
