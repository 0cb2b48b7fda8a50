fn main() -> anyhow::Result<()> {
    pagoda::cli::run()
}
