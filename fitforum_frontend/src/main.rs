fn main() -> anyhow::Result<()> {
    fitforum_frontend::run_frontend().map_err(|err| anyhow::anyhow!(err.to_string()))
}
