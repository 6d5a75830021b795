use crate::equalizer::{Equalizer, EqualizerKind, Error};
use libc::size_t;
use ndarray::ArrayView2;
use num_complex::Complex;
use std::{
    convert::TryFrom,
    ffi::{c_char, c_void, CStr},
};

unsafe fn c_to_string(s: *const c_char) -> String {
    String::from_utf8_lossy(CStr::from_ptr(s).to_bytes()).to_string()
}

#[allow(clippy::useless_conversion)]
fn size_t_to_usize(n: size_t) -> usize {
    usize::try_from(n).unwrap()
}

fn error_code(error: Error) -> i32 {
    match error {
        Error::InvalidNoiseVariance => -1,
        Error::InvalidScaling => -2,
        Error::DimensionMismatch => -3,
        Error::SingularMatrix => -4,
    }
}

fn complex_from_interleaved(buffer: &[f32]) -> Vec<Complex<f32>> {
    buffer
        .chunks_exact(2)
        .map(|c| Complex::new(c[0], c[1]))
        .collect()
}

#[no_mangle]
unsafe extern "C" fn mimo_toolbox_equalizer_ctor(
    kind: *const c_char,
    noise_var: f64,
    tx_scaling: f64,
) -> *mut c_void {
    let kind = c_to_string(kind);
    let Ok(kind) = kind.parse::<EqualizerKind>() else {
        return std::ptr::null_mut();
    };
    if let Ok(equalizer) = Equalizer::new(kind, noise_var, tx_scaling) {
        Box::into_raw(Box::new(equalizer)) as *mut c_void
    } else {
        std::ptr::null_mut()
    }
}

#[no_mangle]
unsafe extern "C" fn mimo_toolbox_equalizer_dtor(equalizer: *mut c_void) {
    drop(Box::from_raw(equalizer as *mut Equalizer));
}

// Buffers carry interleaved re/im f32 pairs; the channel is row-major with
// rx_ports rows and tx_layers columns. On success the function returns 0 and
// fills symbols_out (tx_layers pairs) and noise_vars_out (tx_layers values).
// On failure it returns a negative error code and the output buffers are
// left untouched.
#[no_mangle]
unsafe extern "C" fn mimo_toolbox_equalizer_equalize(
    equalizer: *const c_void,
    symbols_out: *mut f32,
    noise_vars_out: *mut f32,
    rx_symbols: *const f32,
    channel: *const f32,
    rx_ports: size_t,
    tx_layers: size_t,
) -> i32 {
    let rx_ports = size_t_to_usize(rx_ports);
    let tx_layers = size_t_to_usize(tx_layers);
    let equalizer = &*(equalizer as *const Equalizer);
    let rx_symbols =
        complex_from_interleaved(std::slice::from_raw_parts(rx_symbols, 2 * rx_ports));
    let channel = complex_from_interleaved(std::slice::from_raw_parts(
        channel,
        2 * rx_ports * tx_layers,
    ));
    let channel = ArrayView2::from_shape((rx_ports, tx_layers), &channel).unwrap();
    match equalizer.equalize(&rx_symbols, &channel) {
        Ok(out) => {
            let symbols_out = std::slice::from_raw_parts_mut(symbols_out, 2 * tx_layers);
            for (c, x) in symbols_out.chunks_exact_mut(2).zip(out.symbols.iter()) {
                c[0] = x.re;
                c[1] = x.im;
            }
            let noise_vars_out = std::slice::from_raw_parts_mut(noise_vars_out, tx_layers);
            noise_vars_out.copy_from_slice(&out.noise_vars);
            0
        }
        Err(error) => error_code(error),
    }
}
