//! Saída de terminal do `noi`: tabelas e mensagens coloridas.
//!
//! Usa a crate `console` para estilização com cores. O [`Ui`] formata
//! estados, grupos, regras de transição, tipos de ligação e decisões.

use console::Style;
use noi_workflow::{LinkType, NoiError, TransitionRecord, Workflow, WorkflowError};

/// Formatação da saída de terminal.
///
/// Estados ativos e transições permitidas aparecem em verde, recusas em
/// vermelho e metadados em amarelo.
pub struct Ui {
    // Estilo verde para sucesso e estados ativos.
    green: Style,
    // Estilo vermelho para recusas.
    red: Style,
    // Estilo amarelo para cabeçalhos e guardas.
    yellow: Style,
    // Estilo atenuado para informações secundárias.
    dim: Style,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }
}

impl Ui {
    /// Tabela de estados: código, nome, texto, glifo e marcador de ativo.
    /// Estados de votos mostram também o nome do voto.
    pub fn states(&self, workflow: &Workflow) -> String {
        let mut out = format!("{}\n", self.yellow.apply_to(format!("─── {} ───", workflow.name())));
        for state in workflow.all() {
            let active = if state.active {
                self.green.apply_to("active").to_string()
            } else {
                self.dim.apply_to("-").to_string()
            };
            let vote_name = match &state.vote_name {
                Some(name) => format!("  {}", self.dim.apply_to(name)),
                None => String::new(),
            };
            out.push_str(&format!(
                "  {:<4} {:<10} {:<10} {}  {}{vote_name}\n",
                state.code, state.name, state.display_text, state.button_glyph, active
            ));
        }
        out
    }

    /// Grupos de estados com os seus membros.
    pub fn groups(&self, workflow: &Workflow) -> String {
        let mut out = String::new();
        for group in workflow.groups() {
            out.push_str(&format!(
                "  {:<16} {}\n",
                self.yellow.apply_to(&group.name),
                group.states.join(", ")
            ));
        }
        out
    }

    /// Regras de transição na ordem de declaração.
    pub fn transitions(&self, workflow: &Workflow) -> String {
        let mut out = String::new();
        for rule in workflow.rules() {
            let sources = if rule.required_states.is_empty() {
                "*".to_string()
            } else {
                rule.required_states.join(" ")
            };
            let guard = match &rule.guard {
                Some(guard) => format!("  [{}]", self.yellow.apply_to(guard.name)),
                None => String::new(),
            };
            out.push_str(&format!("  {:<10} ← {sources}{guard}\n", rule.target));
        }
        out
    }

    /// Tipos de ligação com os textos do lado pai e do lado filho.
    pub fn links(&self, links: &[LinkType]) -> String {
        let mut out = String::new();
        for link in links {
            out.push_str(&format!(
                "  {:<4} {:<10} {:<10} {}\n",
                link.value(),
                link.name(),
                link.as_parent_text(),
                self.dim.apply_to(link.as_child_text())
            ));
        }
        out
    }

    /// Resultado de uma verificação de transição.
    pub fn decision(&self, from: &str, to: &str, result: &Result<(), WorkflowError>) -> String {
        match result {
            Ok(()) => format!("  {} {from} → {to} allowed", self.green.apply_to("✓")),
            Err(err) => format!(
                "  {} {from} → {to} refused: {} ({err})",
                self.red.apply_to("✗"),
                err.kind()
            ),
        }
    }

    /// Histórico de transições formatado em JSON.
    pub fn history(&self, records: &[TransitionRecord]) -> Result<String, NoiError> {
        let json = serde_json::to_string_pretty(records)?;
        Ok(format!(
            "{}\n{json}",
            self.yellow.apply_to("─── Transition history ───")
        ))
    }
}
