use cached::proc_macro::cached;
use config::{Config, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../CleanCity.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("CleanCity.toml").exists() {
            builder = builder.add_source(File::new("CleanCity.toml", FileFormat::Toml));
        }

        builder.build().unwrap()
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Database {
    pub mongodb: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Hosts {
    pub cdn: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FilesS3 {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Files {
    pub s3: FilesS3,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Geo {
    /// Number of characters in generated geohashes
    pub geohash_precision: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub production: bool,
    pub database: Database,
    pub hosts: Hosts,
    pub files: Files,
    pub geo: Geo,
}

pub async fn init() {
    println!(
        ":: CleanCity Configuration ::\n\x1b[32m{:?}\x1b[0m",
        config().await
    );
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read().await.try_deserialize::<Settings>().unwrap()
}

#[cfg(test)]
mod tests {
    use crate::config;

    #[tokio::test]
    async fn bundled_defaults_deserialise() {
        let settings = config().await;
        assert_eq!(settings.geo.geohash_precision, 10);
        assert!(!settings.files.s3.bucket.is_empty());
    }
}
