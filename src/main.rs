use color_eyre::Result;
use tokio::io::BufReader;
use tradfri_codec::{codec::Codec, host::run_line_loop, settings::read_settings};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let settings = read_settings()?;
    let codec = Codec::from_settings(&settings.codec, None);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    run_line_loop(&codec, &settings.host, stdin, stdout).await?;

    Ok(())
}
