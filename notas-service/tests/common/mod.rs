use cobranza_core::config::Config;
use notas_service::config::{NotasConfig, StorageConfig};
use notas_service::startup::Application;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = NotasConfig {
            common: Config { port: 0 },
            storage: StorageConfig {
                data_dir: data_dir.path().join("data").to_string_lossy().into_owned(),
                docs_dir: data_dir.path().join("docs").to_string_lossy().into_owned(),
            },
        };

        let application = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", application.port());
        tokio::spawn(application.run_until_stopped());

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{address}/health"))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            client,
            _data_dir: data_dir,
        }
    }

    pub async fn upload(&self, filename: &str, content: &[u8]) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client
            .post(format!("{}/api/notas", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute upload")
    }
}
