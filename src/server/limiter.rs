//! # Límite de Conexiones
//! src/server/limiter.rs
//!
//! Semáforo contador: el bucle de accept pide un permiso antes de lanzar
//! cada worker y el permiso se libera cuando el worker termina (también si
//! entra en pánico, porque se libera en `Drop`).

use std::sync::{Arc, Condvar, Mutex, PoisonError};

struct State {
    active: Mutex<usize>,
    released: Condvar,
}

/// Limita el número de workers vivos a la vez
#[derive(Clone)]
pub struct ConnectionLimiter {
    state: Arc<State>,
    max: usize,
}

/// Un hueco ocupado. Se devuelve al soltarlo.
pub struct Permit {
    state: Arc<State>,
}

impl ConnectionLimiter {
    /// `max` se fuerza a 1 como mínimo
    pub fn new(max: usize) -> Self {
        Self {
            state: Arc::new(State {
                active: Mutex::new(0),
                released: Condvar::new(),
            }),
            max: max.max(1),
        }
    }

    /// Bloquea hasta que haya un hueco libre
    pub fn acquire(&self) -> Permit {
        let mut active = self.state.active.lock().unwrap_or_else(PoisonError::into_inner);

        while *active >= self.max {
            active = self
                .state
                .released
                .wait(active)
                .unwrap_or_else(PoisonError::into_inner);
        }

        *active += 1;
        Permit {
            state: Arc::clone(&self.state),
        }
    }

    /// Intenta ocupar un hueco sin bloquear
    pub fn try_acquire(&self) -> Option<Permit> {
        let mut active = self.state.active.lock().unwrap_or_else(PoisonError::into_inner);

        if *active >= self.max {
            return None;
        }

        *active += 1;
        Some(Permit {
            state: Arc::clone(&self.state),
        })
    }

    /// Workers vivos en este momento
    pub fn active(&self) -> usize {
        *self.state.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        let mut active = self.state.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active = active.saturating_sub(1);
        self.state.released.notify_one();
    }
}
