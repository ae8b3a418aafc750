mod mocks;

mod checkout;
mod webhook;
