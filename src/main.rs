use anyhow::Result;

use tweet_harvester::orchestrator::App;
use tweet_harvester::utils::logging;
use tweet_harvester::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 中的登录凭据（文件不存在时忽略）
    let _ = dotenvy::dotenv();

    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用；无论成败都回收浏览器会话
    let app = App::initialize(config).await?;
    let result = app.run().await;
    app.shutdown().await;

    result
}
