//! Async facade tests

use newsboard::surface::RasterSurface;
use newsboard::{CaptureOptions, CategorySample, Dashboard, DashboardConfig, DashboardHandle};

fn handle() -> (DashboardHandle, Vec<String>) {
    let config = DashboardConfig {
        capture: CaptureOptions {
            width: 200,
            chart_height: 60,
            chart_gap: 5,
            row_height: 6,
            table_chunk: 45,
        },
        ..Default::default()
    };
    let categories = config.categories.clone();
    let surface = RasterSurface::new(config.capture.clone());
    let dashboard = Dashboard::new(config, surface).expect("dashboard");
    (DashboardHandle::spawn(dashboard), categories)
}

#[tokio::test]
async fn test_concurrent_notifications_render_once() {
    let (handle, categories) = handle();

    let mut tasks = Vec::new();
    for c in categories.iter().chain(categories.iter()) {
        let h = handle.clone();
        let sample = CategorySample::new(c.as_str(), 100);
        tasks.push(tokio::spawn(async move { h.notify(sample).await }));
    }
    let mut triggers = 0;
    for t in tasks {
        if t.await.unwrap().unwrap() {
            triggers += 1;
        }
    }

    assert_eq!(triggers, 1);
    assert!(handle.is_complete().await.unwrap());
    assert_eq!(handle.chart_renders().await.unwrap(), 1);
    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_export_through_handle() {
    let (handle, categories) = handle();
    for c in &categories {
        handle.notify(CategorySample::new(c.as_str(), 7)).await.unwrap();
    }

    let doc = handle.export().await.unwrap();
    assert!(doc.bytes.starts_with(b"%PDF"));
    assert!(doc.page_count >= 1);
    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_closed_handle_errors() {
    let (handle, _) = handle();
    let other = handle.clone();
    handle.close().await.unwrap();
    // give the worker a moment to drop its receiver
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(other.is_complete().await.is_err());
}
