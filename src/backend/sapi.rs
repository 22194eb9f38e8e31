//! SAPI 5 backend over COM.

use std::marker::PhantomData;
use std::path::Path;

use windows::Win32::Foundation::BOOL;
use windows::Win32::Globalization::GetUserDefaultUILanguage;
use windows::Win32::Media::Audio::WAVEFORMATEX;
use windows::Win32::Media::Speech::{
    ISpObjectToken, ISpObjectTokenCategory, ISpStream, ISpVoice, SPCAT_VOICES,
    SPF_IS_XML, SPFM_CREATE_ALWAYS, SpObjectTokenCategory, SpStream, SpVoice,
};
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx, CoTaskMemFree,
    CoUninitialize,
};
use windows::core::{GUID, HSTRING, PCWSTR};

use super::{BackendError, SpeechBackend, WaveFormat};

/// `SPDFID_WaveFormatEx` from sapiddk.h: the stream format is described by a
/// `WAVEFORMATEX`.
const SPDFID_WAVE_FORMAT_EX: GUID = GUID::from_u128(0xc31adbae_527f_4ff5_a230_f62bb61ff70c);

impl From<windows::core::Error> for BackendError {
    fn from(err: windows::core::Error) -> Self {
        BackendError::Platform(format!("{} ({:?})", err.message(), err.code()))
    }
}

/// COM apartment for the current thread.
///
/// Uninitializes COM when dropped. Not `Send`: the apartment belongs to the
/// thread that created it.
pub struct ComSession {
    _thread_bound: PhantomData<*const ()>,
}

impl ComSession {
    /// Enter a single-threaded apartment.
    pub fn initialize() -> Result<Self, BackendError> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(|e| BackendError::Unavailable(e.message().to_string()))?;

        tracing::debug!("COM initialized");
        Ok(Self {
            _thread_bound: PhantomData,
        })
    }
}

impl Drop for ComSession {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
        tracing::debug!("COM uninitialized");
    }
}

/// SAPI voice object; borrows the COM session it was created in.
pub struct SapiBackend<'com> {
    voice: ISpVoice,
    _session: PhantomData<&'com ComSession>,
}

impl<'com> SapiBackend<'com> {
    /// Create a new SAPI voice instance.
    pub fn new(_session: &'com ComSession) -> Result<Self, BackendError> {
        let voice: ISpVoice = unsafe { CoCreateInstance(&SpVoice, None, CLSCTX_ALL) }?;

        Ok(Self {
            voice,
            _session: PhantomData,
        })
    }
}

/// Read a string value from a token and free the engine-allocated buffer.
fn token_string(token: &ISpObjectToken, value_name: PCWSTR) -> Result<String, BackendError> {
    let value = unsafe { token.GetStringValue(value_name) }?;
    let text = unsafe { value.to_string() };
    unsafe { CoTaskMemFree(Some(value.as_ptr() as *const _)) };

    text.map_err(|e| BackendError::Description(e.to_string()))
}

impl SpeechBackend for SapiBackend<'_> {
    type Token = ISpObjectToken;
    type Stream = ISpStream;

    fn voice_tokens(&self) -> Result<Vec<ISpObjectToken>, BackendError> {
        let category: ISpObjectTokenCategory =
            unsafe { CoCreateInstance(&SpObjectTokenCategory, None, CLSCTX_ALL) }?;
        unsafe { category.SetId(SPCAT_VOICES, BOOL::from(false)) }?;

        let tokens = unsafe { category.EnumTokens(PCWSTR::null(), PCWSTR::null()) }?;
        let mut count = 0u32;
        unsafe { tokens.GetCount(&mut count) }?;

        let mut voices = Vec::with_capacity(count as usize);
        for index in 0..count {
            match unsafe { tokens.Item(index) } {
                Ok(token) => voices.push(token),
                Err(e) => tracing::warn!(index, error = %e, "Skipping unreadable voice token"),
            }
        }

        Ok(voices)
    }

    fn describe(&self, token: &ISpObjectToken) -> Result<String, BackendError> {
        // Localized description first, then the default value.
        let language = HSTRING::from(format!("{:x}", unsafe { GetUserDefaultUILanguage() }));

        token_string(token, PCWSTR(language.as_ptr()))
            .or_else(|_| token_string(token, PCWSTR::null()))
    }

    fn set_voice(&self, token: &ISpObjectToken) -> Result<(), BackendError> {
        unsafe { self.voice.SetVoice(token) }?;
        Ok(())
    }

    fn create_wav_stream(&self, path: &Path, format: &WaveFormat) -> Result<ISpStream, BackendError> {
        let stream: ISpStream = unsafe { CoCreateInstance(&SpStream, None, CLSCTX_ALL) }?;

        let wave = WAVEFORMATEX {
            wFormatTag: format.format_tag(),
            nChannels: format.channels,
            nSamplesPerSec: format.sample_rate,
            nAvgBytesPerSec: format.avg_bytes_per_sec(),
            nBlockAlign: format.block_align(),
            wBitsPerSample: format.bits_per_sample,
            cbSize: 0,
        };

        unsafe {
            stream.BindToFile(
                &HSTRING::from(path),
                SPFM_CREATE_ALWAYS,
                Some(&SPDFID_WAVE_FORMAT_EX as *const GUID),
                Some(&wave as *const WAVEFORMATEX),
                0,
            )
        }?;

        Ok(stream)
    }

    fn set_output(&self, stream: &ISpStream) -> Result<(), BackendError> {
        unsafe { self.voice.SetOutput(stream, BOOL::from(true)) }?;
        Ok(())
    }

    fn speak_markup(&self, text: &str) -> Result<(), BackendError> {
        // Without SPF_ASYNC the call returns once the stream is fully written.
        unsafe { self.voice.Speak(&HSTRING::from(text), SPF_IS_XML.0 as u32, None) }?;
        Ok(())
    }

    fn close_stream(&self, stream: ISpStream) -> Result<(), BackendError> {
        unsafe { stream.Close() }?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::inspect_output;
    use tempfile::TempDir;

    #[test]
    fn test_bind_to_file_writes_wav_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bound.wav");
        let format = WaveFormat::stereo_48khz_16bit().unwrap();

        let session = ComSession::initialize().unwrap();
        let backend = SapiBackend::new(&session).unwrap();
        let stream = backend.create_wav_stream(&path, &format).unwrap();
        backend.close_stream(stream).unwrap();

        let summary = inspect_output(&path).unwrap();
        assert_eq!(summary.sample_rate, 48_000);
        assert_eq!(summary.channels, 2);
        assert_eq!(summary.bits_per_sample, 16);
        assert_eq!(summary.frames, 0);
    }
}
