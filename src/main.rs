#[tokio::main]
async fn main() {
    if let Err(e) = receipt_points_lib::run().await {
        log::error!("サーバーの実行中にエラーが発生しました: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
