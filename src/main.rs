use chrono::Utc;
use clap::Parser;
use dialoguer::{Confirm, Password};
use edu_feed::api::auth::{Credentials, RegisterRequest};
use edu_feed::api::Services;
use edu_feed::cli::{
    AdminAction, AuthAction, Cli, Commands, DashboardSection, FeedAction, ProfileAction, SprintAction,
};
use edu_feed::config::Config;
use edu_feed::error::{FeedError, Result};
use edu_feed::feed::{AnalysisBook, Composer};
use edu_feed::scanner::{self, ImageCandidate};
use edu_feed::screening::ScreeningGate;
use edu_feed::sprint::SprintBoard;
use edu_feed::store::PostStore;
use edu_feed::{profile, traits::SprintRemote};
use edu_feed_common::{
    calculate_progress, detect_fake_claims, find_forbidden_words, status_label, task_counts,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "edu_feed=debug" } else { "edu_feed=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        if matches!(e, FeedError::Unauthorized) {
            // 期限切れのトークンを破棄
            match Config::load() {
                Ok(mut config) if config.token.is_some() => {
                    if let Err(clear_err) = config.clear_token() {
                        warn!(error = %clear_err, "トークンの削除に失敗しました");
                    }
                }
                Ok(_) => {}
                Err(load_err) => warn!(error = %load_err, "設定を読み込めません"),
            }
        }
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Post { text, images, image_dir } => {
            println!("📝 edu-feed - 投稿作成\n");

            let mut composer = Composer::with_text(text);
            for path in &images {
                composer.add_image(path)?;
            }
            if let Some(dir) = image_dir {
                for path in scanner::scan_folder(&dir)? {
                    composer.add_image(&path)?;
                }
            }

            let services = Services::from_config(&config)?;
            let gate = ScreeningGate::new(
                Box::new(services.moderation.clone()),
                Box::new(services.admin.clone()),
                Box::new(services.upload.clone()),
            );
            let mut store = PostStore::load(config.resolved_store_path()?)?;

            let pb = spinner(if composer.images().is_empty() {
                "投稿中..."
            } else {
                "画像を検査中..."
            });
            let result = composer.submit(&mut store, &gate).await;
            pb.finish_and_clear();

            let outcome = result?;
            if let Some(warning) = &outcome.warning {
                println!("⚠ {}", warning);
            }
            println!(
                "✔ 投稿を作成しました (id: {}, 画像: {}枚)",
                outcome.post.id,
                outcome.post.images.len()
            );
        }

        Commands::Check { text } => {
            let words = find_forbidden_words(&text);
            if words.is_empty() {
                println!("✔ 禁止語は含まれていません");
            } else {
                println!("✖ 禁止語を検出: {}", words.join(", "));
            }

            let claims = detect_fake_claims(&text);
            if claims.is_empty() {
                println!("✔ 既知の誤情報は含まれていません");
            } else {
                println!("⚠ 既知の誤情報を{}件検出:", claims.len());
                for claim in &claims {
                    println!("  - 「{}」→ {} [{}]", claim.fake, claim.correct, claim.category);
                }
            }
        }

        Commands::Feed { action } => run_feed(action, &config).await?,

        Commands::Sprint { action } => {
            let services = Services::from_config(&config)?;
            run_sprint(action, &services.dashboard).await?;
        }

        Commands::Admin { action } => {
            let services = Services::from_config(&config)?;
            match action {
                AdminAction::Stats => print_json(&services.admin.analysis_stats().await?)?,
                AdminAction::Details => print_json(&services.admin.detailed_analyses().await?)?,
                AdminAction::Reports => print_json(&services.admin.reported_posts().await?)?,
                AdminAction::Delete { ids } => {
                    if let [id] = ids.as_slice() {
                        services.admin.delete_analysis(*id).await?;
                    } else {
                        services.admin.delete_batch_analyses(&ids).await?;
                    }
                    println!("✔ {}件の解析を削除しました", ids.len());
                }
                AdminAction::Clear { yes } => {
                    if confirm("すべての解析を削除しますか？", yes)? {
                        services.admin.clear_all_analyses().await?;
                        println!("✔ すべての解析を削除しました");
                    } else {
                        println!("キャンセルしました");
                    }
                }
            }
        }

        Commands::Auth { action } => run_auth(action, &mut config).await?,

        Commands::Profile { action } => {
            let services = Services::from_config(&config)?;
            match action {
                ProfileAction::Show => {
                    let p = services.profile.get().await?;
                    println!("{} {} <{}>", p.first_name, p.last_name, p.email);
                    for (label, value) in [
                        ("電話", &p.phone),
                        ("所在地", &p.location),
                        ("Web", &p.website),
                        ("GitHub", &p.github),
                        ("LinkedIn", &p.linkedin),
                        ("Twitter", &p.twitter),
                        ("自己紹介", &p.bio),
                    ] {
                        if !value.is_empty() {
                            println!("  {}: {}", label, value);
                        }
                    }
                    if !p.skills.is_empty() {
                        println!("  スキル: {}", p.skills.join(", "));
                    }
                    if !p.languages.is_empty() {
                        println!("  言語: {}", p.languages.join(", "));
                    }
                }
                ProfileAction::Set { key, value } => {
                    let mut current = services.profile.get().await?;
                    let next = profile::apply_field(&current, &key, &value)
                        .ok_or_else(|| FeedError::Config(format!("不明な項目: {}", key)))?;
                    profile::update_profile(&mut current, next, &services.profile).await?;
                    println!("✔ {} を更新しました", key);
                }
                ProfileAction::Photo { path } => {
                    let photo = ImageCandidate::from_path(&path)?;
                    services.profile.upload_photo(&photo).await?;
                    println!("✔ 写真をアップロードしました");
                }
                ProfileAction::DeletePhoto => {
                    services.profile.delete_photo().await?;
                    println!("✔ 写真を削除しました");
                }
            }
        }

        Commands::Dashboard { section } => {
            let services = Services::from_config(&config)?;
            let value = match section {
                DashboardSection::Achievements => services.dashboard.achievements().await?,
                DashboardSection::Events => services.dashboard.events().await?,
                DashboardSection::Progress => services.dashboard.progress().await?,
                DashboardSection::Courses => services.dashboard.courses().await?,
            };
            print_json(&value)?;
        }

        Commands::Chat { message, context } => {
            let services = Services::from_config(&config)?;
            let pb = spinner("回答を待っています...");
            let reply = services.chatbot.chat(&message, None, context.as_deref()).await;
            pb.finish_and_clear();
            println!("{}", reply?.response);
        }

        Commands::Status => {
            let services = Services::from_config(&config)?;
            println!("AIサービス: {}", config.api_url);
            match services.chatbot.health().await {
                Ok(v) => println!("  health: {}", v),
                Err(e) => println!("  health: ✖ {}", e),
            }
            match services.chatbot.metrics().await {
                Ok(v) => println!("  metrics: {}", v),
                Err(e) => println!("  metrics: ✖ {}", e),
            }
            match services.moderation.stats().await {
                Ok(v) => println!("  moderation: {}", v),
                Err(e) => println!("  moderation: ✖ {}", e),
            }
        }

        Commands::Config { set_api_url, set_token, clear_token, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }
            if let Some(token) = set_token {
                config.set_token(token)?;
                println!("✔ トークンを設定しました");
            }
            if clear_token {
                config.clear_token()?;
                println!("✔ トークンを削除しました");
            }

            if show {
                println!("設定:");
                println!("  AIサービス: {}", config.api_url);
                println!("  ダッシュボード: {}", config.dashboard_url);
                println!("  アップロード: {}", config.upload_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  投稿ファイル: {}", config.resolved_store_path()?.display());
                println!("  トークン: {}", if config.token.is_some() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Store { info, reset, yes } => {
            let path = config.resolved_store_path()?;

            if info || !reset {
                let store = PostStore::load(&path)?;
                println!("投稿ファイル:");
                println!("  パス: {}", path.display());
                println!("  件数: {}", store.len());
                match std::fs::metadata(&path) {
                    Ok(meta) => println!("  サイズ: {} bytes", meta.len()),
                    Err(_) => println!("  （未保存・初期投稿を表示中）"),
                }
            }

            if reset {
                if confirm("投稿を初期状態に戻しますか？", yes)? {
                    let mut store = PostStore::load(&path)?;
                    store.reset()?;
                    println!("✔ 初期投稿に戻しました ({}件)", store.len());
                } else {
                    println!("キャンセルしました");
                }
            }
        }
    }

    Ok(())
}

async fn run_feed(action: FeedAction, config: &Config) -> Result<()> {
    let mut store = PostStore::load(config.resolved_store_path()?)?;

    match action {
        FeedAction::List { limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            for post in store.posts().iter().take(limit) {
                println!(
                    "[{}] {} ({}) · {}  ♥ {}{}  💬 {}",
                    post.id,
                    post.author,
                    post.avatar,
                    post.time,
                    post.likes,
                    if post.liked { " (済)" } else { "" },
                    post.comments
                );
                if !post.content.is_empty() {
                    println!("    {}", post.content);
                }
                for image in &post.images {
                    println!("    🖼 {}", image.display_url());
                }
            }
        }

        FeedAction::Like { id } => {
            let post = store.toggle_like(id)?;
            println!(
                "✔ {} (♥ {})",
                if post.liked { "いいねしました" } else { "いいねを取り消しました" },
                post.likes
            );
        }

        FeedAction::Delete { id, yes } => {
            if store.get(id).is_none() {
                return Err(FeedError::PostNotFound(id));
            }
            if confirm("この投稿を削除しますか？", yes)? {
                store.delete(id)?;
                println!("✔ 投稿を削除しました");
            } else {
                println!("キャンセルしました");
            }
        }

        FeedAction::Analyze { id } => {
            let post = store.get(id).cloned().ok_or(FeedError::PostNotFound(id))?;
            let services = Services::from_config(config)?;
            let mut book = AnalysisBook::new();

            let pb = spinner("投稿を解析中...");
            let result = book.analyze(&post, &services.analysis, &services.admin).await;
            pb.finish_and_clear();
            let outcome = result?;
            let analysis = &outcome.analysis;

            println!("📊 解析結果 (投稿 {})", post.id);
            if let Some(label) = analysis.sentiment_label() {
                println!("  感情: {}", label);
            }
            if let Some(risk) = analysis.fake_news_risk() {
                println!("  誤情報リスク: {:.0}%", risk * 100.0);
            }
            for claim in &analysis.fake_news_detected {
                println!("  ⚠ 誤情報: 「{}」→ {}", claim.fake, claim.correct);
            }
            if !analysis.chat_analysis.response.is_empty() {
                println!("\n{}", analysis.chat_analysis.response);
            }
            if outcome.admin_notified {
                println!("\n✔ 管理ダッシュボードへ送信しました");
            } else {
                println!("\n⚠ 解析は完了しましたが管理ダッシュボードへの送信に失敗しました");
            }
        }

        FeedAction::Report { id, reason } => {
            let post = store.get(id).ok_or(FeedError::PostNotFound(id))?;
            let services = Services::from_config(config)?;
            services
                .admin
                .report_post(post, &reason, None, Utc::now().to_rfc3339())
                .await?;
            println!("✔ 投稿を通報しました");
        }
    }

    Ok(())
}

async fn run_sprint(action: SprintAction, remote: &dyn SprintRemote) -> Result<()> {
    let mut board = SprintBoard::load(remote).await?;

    match action {
        SprintAction::List => {
            if board.sprints().is_empty() {
                println!("スプリントがありません");
            }
            for (i, sprint) in board.sprints().iter().enumerate() {
                let (done, total) = task_counts(sprint);
                println!(
                    "{} [{}] {} ({}) {}/{} タスク · {}%",
                    if i == board.active_index() { "▶" } else { " " },
                    sprint.id,
                    sprint.title,
                    status_label(sprint.status),
                    done,
                    total,
                    calculate_progress(sprint)
                );
                for task in &sprint.tasks {
                    println!(
                        "      {} [{}] {}",
                        if task.completed { "☑" } else { "☐" },
                        task.id,
                        task.title
                    );
                }
            }
        }

        SprintAction::Toggle { task_id, sprint } => {
            if let Some(id) = sprint {
                board.select(id)?;
            }
            let completed = board.toggle_task(remote, task_id).await?;
            println!(
                "✔ タスク {} を{}にしました",
                task_id,
                if completed { "完了" } else { "未完了" }
            );
        }

        SprintAction::Add { title, sprint } => {
            if let Some(id) = sprint {
                board.select(id)?;
            }
            match board.add_task(remote, &title).await? {
                Some(task) if board.is_pending(task.id) => {
                    println!("✔ タスクを追加しました（サーバーとの同期待ち）")
                }
                Some(_) => println!("✔ タスクを追加しました"),
                None => println!("タイトルが空のため追加しませんでした"),
            }
        }

        SprintAction::Complete { sprint_id } => {
            board.complete_sprint(remote, sprint_id).await?;
            println!("✔ スプリント {} を完了にしました", sprint_id);
        }
    }

    Ok(())
}

async fn run_auth(action: AuthAction, config: &mut Config) -> Result<()> {
    let services = Services::from_config(config)?;

    match action {
        AuthAction::Login { email } => {
            let password = Password::new()
                .with_prompt("パスワード")
                .interact()
                .map_err(|e| FeedError::Prompt(e.to_string()))?;
            let response = services.auth.login(&Credentials { email, password }).await?;
            config.set_token(response.token)?;
            println!("✔ ログインしました");
        }
        AuthAction::Register { email, first_name, last_name } => {
            let password = Password::new()
                .with_prompt("パスワード")
                .with_confirmation("パスワード（確認）", "パスワードが一致しません")
                .interact()
                .map_err(|e| FeedError::Prompt(e.to_string()))?;
            let request = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let response = services.auth.register(&request).await?;
            config.set_token(response.token)?;
            println!("✔ 登録しました");
        }
        AuthAction::Logout => {
            if let Err(e) = services.auth.logout().await {
                warn!(error = %e, "サーバー側のログアウトに失敗しました");
            }
            config.clear_token()?;
            println!("✔ ログアウトしました");
        }
        AuthAction::Me => print_json(&services.auth.me().await?)?,
    }

    Ok(())
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| FeedError::Prompt(e.to_string()))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
