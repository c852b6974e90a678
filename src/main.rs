use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use voz_tutor::{
    auth, CaptureKind, CommandSpeechPlayer, Config, ConsoleNotifier, ExchangeClient, NullPlayer,
    SpeechPlayer, StdinConfirm, VoiceController,
};

#[derive(Parser, Debug)]
#[command(name = "voz-tutor", about = "Cliente de voz para o professor virtual")]
struct Cli {
    /// Configuration file (TOML, optional)
    #[arg(short, long, default_value = "config/voz-tutor")]
    config: String,

    /// Record from a pre-encoded audio file instead of the microphone
    #[arg(short, long)]
    input: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;

    if let Some(input) = cli.input {
        cfg.capture.kind = CaptureKind::File;
        cfg.capture.input_file = Some(input);
    }

    let token = auth::read_token(&cfg.server.cookie_file, &cfg.server.cookie_name);
    let client = ExchangeClient::new(cfg.server.upload_url(), token);

    info!("{} v0.1.0", cfg.service.name);
    info!("Upload endpoint: {}", client.endpoint());

    let player: Arc<dyn SpeechPlayer> = if cfg.playback.enabled {
        Arc::new(CommandSpeechPlayer::new(
            cfg.playback.command.clone(),
            cfg.playback.args.clone(),
        ))
    } else {
        Arc::new(NullPlayer)
    };

    let controller = VoiceController::new(
        client,
        Arc::new(ConsoleNotifier),
        Arc::new(StdinConfirm),
        player,
    );
    controller.initialize(&cfg.capture).await;

    println!("Comandos: start, stop, reset, log, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "start" => controller.start().await,
            "stop" => controller.stop().await,
            "reset" => controller.reset().await,
            "log" => {
                for entry in controller.transcript().entries().await {
                    println!("{}", entry.text);
                }
            }
            "quit" | "sair" => break,
            "" => {}
            other => println!("Comando desconhecido: {}", other),
        }
    }

    // Let an in-flight upload land before exiting.
    controller.wait_idle().await;

    Ok(())
}
