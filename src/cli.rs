//! Interface de linha de comando do `noi` baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (states, groups,
//! transitions, links, check, demo) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use noi_workflow::WorkflowKind;

/// noi: workflows de tickets e votos do Lino Noi.
#[derive(Debug, Parser)]
#[command(name = "noi", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: `noi.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Workflow aceito pela CLI, mapeado para [`WorkflowKind`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkflowArg {
    /// Estados de tickets.
    Tickets,
    /// Estados de votos.
    Votes,
}

impl From<WorkflowArg> for WorkflowKind {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Tickets => WorkflowKind::Tickets,
            WorkflowArg::Votes => WorkflowKind::Votes,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lista os estados de um workflow, ordenados por código.
    States {
        workflow: Option<WorkflowArg>,
    },

    /// Lista os grupos de estados de um workflow.
    Groups {
        workflow: Option<WorkflowArg>,
    },

    /// Lista as regras de transição de um workflow.
    Transitions {
        workflow: Option<WorkflowArg>,
    },

    /// Lista os tipos de ligação entre tickets.
    Links,

    /// Avalia se um usuário pode executar uma transição.
    Check {
        /// Workflow a usar (padrão: o da configuração).
        #[arg(long)]
        workflow: Option<WorkflowArg>,

        /// Estado atual (nome ou código).
        #[arg(long)]
        from: String,

        /// Estado desejado (nome ou código).
        #[arg(long)]
        to: String,

        /// Usuário que executa a transição.
        #[arg(long)]
        user: String,

        /// Autor do ticket (padrão: o próprio --user).
        #[arg(long)]
        reporter: Option<String>,

        /// Avaliação já registrada (valor como "20" ou nome como "good").
        #[arg(long)]
        rating: Option<String>,
    },

    /// Executa a demonstração embutida com um armazenamento em memória.
    Demo,
}
