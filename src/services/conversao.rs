// src/services/conversao.rs

use rust_decimal::Decimal;

use crate::common::error::AppError;
use crate::models::catalogo::Unidade;

/// Converte uma quantidade digitada em unidade arbitrária para a unidade
/// padrão de estocagem do produto. Só definida para valores positivos.
pub fn converter(quantidade: Decimal, unidade: &Unidade) -> Result<Decimal, AppError> {
    if quantidade <= Decimal::ZERO {
        return Err(AppError::validacao("A quantidade deve ser maior que zero."));
    }
    if unidade.fator <= Decimal::ZERO {
        return Err(AppError::validacao("Fator de conversão inválido."));
    }
    Ok(quantidade * unidade.fator)
}

/// A linha de conversão só aparece quando a unidade não é a padrão
/// (mostrar "10 UN = 10 UN" seria redundante).
pub fn exibe_conversao(unidade: &Unidade) -> bool {
    unidade.fator != Decimal::ONE
}

/// Legenda exibida abaixo do campo de quantidade, ex: "= 24.00 UN".
pub fn legenda_conversao(
    quantidade: Decimal,
    unidade: &Unidade,
    sigla_padrao: &str,
) -> Result<Option<String>, AppError> {
    if !exibe_conversao(unidade) {
        return Ok(None);
    }
    let padrao = converter(quantidade, unidade)?;
    Ok(Some(format!("= {:.2} {}", padrao, sigla_padrao)))
}
