use std::sync::Arc;

use tweet_harvester::browser::connect_to_browser_and_page;
use tweet_harvester::infrastructure::{SessionDriver, TimelineSession};
use tweet_harvester::orchestrator::ParallelHarvester;
use tweet_harvester::utils::logging;
use tweet_harvester::Config;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_connection() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    let port = config
        .browser_debug_port
        .expect("需要设置 BROWSER_DEBUG_PORT");

    // 测试浏览器连接
    let result = connect_to_browser_and_page(port, &config.timeline_url).await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_page_height_readable_on_live_session() {
    logging::init();

    let config = Config::from_env();
    let port = config
        .browser_debug_port
        .expect("需要设置 BROWSER_DEBUG_PORT");

    let (_browser, page) = connect_to_browser_and_page(port, &config.timeline_url)
        .await
        .expect("连接浏览器失败");

    let session = TimelineSession::new(page, config.record_selector.clone());
    let height = session.page_height().await.expect("读取页面高度失败");

    println!("当前页面高度: {}", height);
    assert!(height >= 0);
}

#[tokio::test]
#[ignore]
async fn test_parallel_harvest_against_live_timeline() {
    logging::init();

    // 注意：需要浏览器已登录并停留在目标时间线
    let config = Config::from_env();
    let port = config
        .browser_debug_port
        .expect("需要设置 BROWSER_DEBUG_PORT");

    let (_browser, page) = connect_to_browser_and_page(port, &config.timeline_url)
        .await
        .expect("连接浏览器失败");

    let session = Arc::new(TimelineSession::new(page, config.record_selector.clone()));
    let harvester = ParallelHarvester::from_config(&config);

    let records = harvester
        .run(session, config.total_records, config.worker_count)
        .await
        .expect("并行采集失败");

    println!("采集到 {} 条记录", records.len());
    for record in records.as_slice().iter().take(3) {
        println!("  - {}", logging::truncate_text(record, 60));
    }

    // 去重不变式
    let unique: std::collections::HashSet<_> = records.as_slice().iter().collect();
    assert_eq!(unique.len(), records.len());
}
