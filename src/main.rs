fn main() -> anyhow::Result<()> {
    mlscrape::cli::run()
}
