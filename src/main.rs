fn main() -> anyhow::Result<()> {
    log_lens::run()
}
