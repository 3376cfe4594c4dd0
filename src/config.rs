//! Configuração do `noi` carregada a partir de `noi.toml`.
//!
//! A struct [`NoiConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `NOI_LOG` tem precedência sobre o arquivo para o nível de log.

use std::path::Path;

use noi_workflow::{NoiError, PrincipalId, UserDirectory, UserType, WorkflowKind};
use serde::Deserialize;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "noi.toml";

/// Um usuário conhecido e o seu tipo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub user_type: UserType,
}

/// Configuração de nível superior carregada de `noi.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NoiConfig {
    /// Filtro de log no formato do `EnvFilter` ("info", "noi_workflow=debug", ...).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Workflow usado quando a CLI não especifica nenhum.
    #[serde(default = "default_workflow")]
    pub default_workflow: WorkflowKind,

    /// Usuários e tipos de usuário usados para verificar permissões.
    #[serde(default = "default_users")]
    pub users: Vec<UserEntry>,
}

// Valor padrão para o nível de log: "info".
fn default_log_level() -> String {
    "info".to_string()
}

fn default_workflow() -> WorkflowKind {
    WorkflowKind::Tickets
}

// Os usuários da base de demonstração.
fn default_users() -> Vec<UserEntry> {
    [
        ("mathieu", UserType::Consultant),
        ("marc", UserType::Consultant),
        ("luc", UserType::Developer),
        ("jean", UserType::Senior),
    ]
    .into_iter()
    .map(|(username, user_type)| UserEntry {
        username: username.to_string(),
        user_type,
    })
    .collect()
}

impl Default for NoiConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_workflow: default_workflow(),
            users: default_users(),
        }
    }
}

impl NoiConfig {
    /// Carrega a configuração de `noi.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, NoiError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    pub fn load_from(path: &Path) -> Result<Self, NoiError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<NoiConfig>(&contents)?
        } else {
            Self::default()
        };
        config.apply_log_override(std::env::var("NOI_LOG").ok());
        Ok(config)
    }

    // Variável de ambiente tem precedência sobre o arquivo de configuração.
    fn apply_log_override(&mut self, value: Option<String>) {
        if let Some(level) = value
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }

    /// Diretório de usuários para as verificações de papel.
    pub fn directory(&self) -> UserDirectory {
        let mut directory = UserDirectory::new();
        for user in &self.users {
            directory.insert(PrincipalId::new(&user.username), user.user_type);
        }
        directory
    }
}
