use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de entrada/saída: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Erro de serialização: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Erro ao gerar planilha: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Nenhum registro encontrado no CSV")]
    EmptyFile,

    #[error("Nenhum dado importado")]
    NoDataset,

    #[error("Importação já em andamento")]
    ImportInProgress,

    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
