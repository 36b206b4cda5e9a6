fn main() -> anyhow::Result<()> {
    importsave::cli::run_cli()
}
