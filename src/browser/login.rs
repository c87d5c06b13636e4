//! Twitter 登录流程
//!
//! 登录页是分步表单：先输入用户名回车，等密码框出现，
//! 再输入密码回车。每步之间留固定等待，页面跳转没有完成信号。

use anyhow::{anyhow, Result};
use chromiumoxide::Page;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::config::Config;

const PAGE_LOAD_WAIT: Duration = Duration::from_secs(5);
const FIELD_WAIT: Duration = Duration::from_secs(3);
const LOGIN_SETTLE_WAIT: Duration = Duration::from_secs(5);

/// 在登录页完成 Twitter 登录
///
/// # 参数
/// - `page`: 任意可导航的页面
/// - `config`: 提供登录 URL 与凭据
pub async fn login_to_twitter(page: &Page, config: &Config) -> Result<()> {
    info!("🔑 打开登录页面: {}", config.login_url);
    page.goto(config.login_url.as_str()).await?;
    sleep(PAGE_LOAD_WAIT).await;

    debug!("填写用户名");
    fill_and_submit(page, r#"input[name="text"]"#, &config.twitter_username).await?;
    sleep(FIELD_WAIT).await;

    debug!("填写密码");
    fill_and_submit(page, r#"input[name="password"]"#, &config.twitter_password).await?;
    sleep(LOGIN_SETTLE_WAIT).await;

    info!("✓ 登录流程已完成");
    Ok(())
}

/// 向输入框写入值并按回车提交
///
/// React 受控组件不认直接赋值，必须走原生 setter 并派发 input 事件
async fn fill_and_submit(page: &Page, selector: &str, value: &str) -> Result<()> {
    // 通过 JSON 序列化做字符串转义，避免凭据里的引号破坏 JS
    let selector_js = serde_json::to_string(selector)?;
    let value_js = serde_json::to_string(value)?;

    let js_code = format!(
        r#"
        (() => {{
            const field = document.querySelector({selector});
            if (!field) {{
                return false;
            }}
            const setter = Object.getOwnPropertyDescriptor(
                window.HTMLInputElement.prototype, 'value'
            ).set;
            setter.call(field, {value});
            field.dispatchEvent(new Event('input', {{ bubbles: true }}));
            field.dispatchEvent(new KeyboardEvent('keydown', {{
                key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true
            }}));
            field.dispatchEvent(new KeyboardEvent('keyup', {{
                key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true
            }}));
            return true;
        }})()
        "#,
        selector = selector_js,
        value = value_js,
    );

    let found: bool = page.evaluate(js_code).await?.into_value()?;
    if !found {
        return Err(anyhow!("未找到输入框: {}", selector));
    }
    Ok(())
}
